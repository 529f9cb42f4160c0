//! Detects sustained quiet input and blinks a prompt.

use serde::{Deserialize, Serialize};

/// Thresholds for the silence prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SilenceConfig {
    /// Peak level (0..=32768) below which a tick counts as quiet
    #[serde(default = "default_threshold")]
    pub threshold: u16,
    /// Quiet ticks required before the prompt may appear
    #[serde(default = "default_min_quiet_ticks")]
    pub min_quiet_ticks: u32,
    /// Bit of the quiet counter that switches the prompt on (blink phase)
    #[serde(default = "default_blink_mask")]
    pub blink_mask: u32,
}

fn default_threshold() -> u16 {
    500
}

fn default_min_quiet_ticks() -> u32 {
    40
}

fn default_blink_mask() -> u32 {
    16
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_quiet_ticks: default_min_quiet_ticks(),
            blink_mask: default_blink_mask(),
        }
    }
}

/// Counts consecutive quiet ticks.
#[derive(Debug, Clone)]
pub struct SilenceMonitor {
    config: SilenceConfig,
    quiet_count: u32,
}

impl SilenceMonitor {
    pub fn new(config: SilenceConfig) -> Self {
        Self {
            config,
            quiet_count: 0,
        }
    }

    /// Feeds one tick's level reading.
    pub fn on_tick(&mut self, level: u16) {
        if level < self.config.threshold {
            self.quiet_count = self.quiet_count.saturating_add(1);
            if self.quiet_count == self.config.min_quiet_ticks + 1 {
                tracing::debug!("Input quiet for {} ticks", self.quiet_count);
            }
        } else {
            self.quiet_count = 0;
        }
    }

    /// Whether the prompt is visible this tick.
    pub fn should_show_overlay(&self) -> bool {
        self.quiet_count > self.config.min_quiet_ticks
            && self.quiet_count & self.config.blink_mask != 0
    }

    pub fn quiet_count(&self) -> u32 {
        self.quiet_count
    }

    /// Forgets any quiet streak.
    pub fn reset(&mut self) {
        self.quiet_count = 0;
    }
}

impl Default for SilenceMonitor {
    fn default() -> Self {
        Self::new(SilenceConfig::default())
    }
}
