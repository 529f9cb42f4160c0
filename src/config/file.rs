//! Configuration file management for livespec.
//!
//! Settings live in `~/.config/livespec/livespec.toml`. Every field has a
//! default, so a missing file or a partial one both load.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::visualizer::{RenderMode, SilenceConfig};

/// Audio input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `livespec list-devices`
    /// - device name from `livespec list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Requested sample rate in Hz; the device's own rate is used if it differs
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    48000
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Mode shown at startup
    #[serde(default)]
    pub mode: RenderMode,
    /// Milliseconds between frames
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl DisplayConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivespecConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub silence: SilenceConfig,
}

impl LivespecConfig {
    /// Loads configuration from the user's config directory, falling back to
    /// defaults when no file exists.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed or holds invalid values
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// - If the file exists but cannot be read or parsed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: LivespecConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves configuration to an explicit path, creating parent directories.
    ///
    /// # Errors
    /// - If the directory cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, mode: Option<RenderMode>, device: Option<String>) -> Self {
        if let Some(mode) = mode {
            self.display.mode = mode;
        }
        if let Some(device) = device {
            self.audio.device = device;
        }
        self
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.display.tick_ms == 0 {
            return Err(anyhow!("display.tick_ms must be greater than zero"));
        }
        if self.audio.sample_rate == 0 {
            return Err(anyhow!("audio.sample_rate must be greater than zero"));
        }
        Ok(())
    }
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".config").join("livespec").join("livespec.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("livespec_config_{}_{}", std::process::id(), name))
            .join("livespec.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = LivespecConfig::load_from(&temp_path("missing")).unwrap();
        assert_eq!(config, LivespecConfig::default());
        assert_eq!(config.audio.device, "default");
        assert_eq!(config.display.tick(), Duration::from_millis(50));
        assert_eq!(config.silence.threshold, 500);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: LivespecConfig = toml::from_str(
            r#"
            [display]
            mode = "waveform"

            [silence]
            threshold = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.display.mode, RenderMode::Waveform);
        assert_eq!(config.display.tick_ms, 50);
        assert_eq!(config.silence.threshold, 1000);
        assert_eq!(config.silence.min_quiet_ticks, 40);
        assert_eq!(config.audio.sample_rate, 48000);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let mut config = LivespecConfig::default();
        config.audio.device = "USB Mic".to_string();
        config.display.mode = RenderMode::ScrollingSpectrum;
        config.save_to(&path).unwrap();

        assert_eq!(LivespecConfig::load_from(&path).unwrap(), config);
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let path = temp_path("zero_tick");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[display]\ntick_ms = 0\n").unwrap();

        let err = LivespecConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("tick_ms"));
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_overrides_win() {
        let config = LivespecConfig::default()
            .with_overrides(Some(RenderMode::BandedSpectrum), Some("2".to_string()));
        assert_eq!(config.display.mode, RenderMode::BandedSpectrum);
        assert_eq!(config.audio.device, "2");

        let untouched = LivespecConfig::default().with_overrides(None, None);
        assert_eq!(untouched, LivespecConfig::default());
    }
}
