//! The visualizer itself, fed from a live device or a WAV file.
//!
//! Both sources share one tick loop. SIGUSR1 cycles the display mode from
//! outside the process, e.g. from a window manager keybinding.

use crate::capture::{LiveCapture, WavSource};
use crate::config::LivespecConfig;
use crate::ui::{ErrorScreen, LivespecTui, UiCommand};
use crate::visualizer::{AudioSource, RenderLoop, RenderMode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};

/// Visualizes live input from the configured (or overridden) device.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the audio device cannot be opened
/// - If the terminal fails
pub async fn handle_run(mode: Option<RenderMode>, device: Option<String>) -> anyhow::Result<()> {
    tracing::info!("=== livespec started (live input) ===");

    let config = load_config(mode, device)?;
    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, mode={}, tick={}ms",
        config.audio.device,
        config.audio.sample_rate,
        config.display.mode,
        config.display.tick_ms
    );

    let mut capture = LiveCapture::new(config.audio.sample_rate, config.audio.device.clone());
    if let Err(e) = capture.start() {
        tracing::error!("Failed to start capture: {}", e);
        show_fatal(&format!(
            "Audio Input Error:\n\n{e}\n\nPlease check your audio configuration and try again."
        ))?;
        return Err(e);
    }

    let result = visualize(&mut capture, &config).await;
    capture.stop();
    result
}

/// Visualizes a WAV file at real-time pace.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the file cannot be decoded
/// - If the terminal fails
pub async fn handle_play(
    file: PathBuf,
    looping: bool,
    mode: Option<RenderMode>,
) -> anyhow::Result<()> {
    tracing::info!("=== livespec started (file {}) ===", file.display());

    let config = load_config(mode, None)?;

    let mut source = match WavSource::open(&file, config.display.tick(), looping) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to open {}: {:#}", file.display(), e);
            show_fatal(&format!("File Error:\n\n{e:#}"))?;
            return Err(e);
        }
    };

    visualize(&mut source, &config).await
}

fn load_config(mode: Option<RenderMode>, device: Option<String>) -> anyhow::Result<LivespecConfig> {
    match LivespecConfig::load() {
        Ok(config) => Ok(config.with_overrides(mode, device)),
        Err(err) => {
            tracing::error!("Failed to load configuration: {:#}", err);
            show_fatal(&format!(
                "Configuration Error:\n\n{err:#}\n\nPlease check your ~/.config/livespec/livespec.toml file and try again."
            ))?;
            Err(err)
        }
    }
}

fn show_fatal(message: &str) -> anyhow::Result<()> {
    let mut error_screen = ErrorScreen::new()?;
    error_screen.show_error(message)?;
    error_screen.cleanup()
}

/// Runs ticks until the user quits or the source runs dry.
async fn visualize(source: &mut dyn AudioSource, config: &LivespecConfig) -> anyhow::Result<()> {
    let mut tui = LivespecTui::new()?;
    let (width, height) = tui.pixel_size()?;
    let mut render_loop = RenderLoop::new(width, height, config.display.mode, config.silence);

    let cycle_requested = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&cycle_requested))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    let mut ticker = interval(config.display.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::debug!(
        "Entering render loop from {}. Click to change mode, 'q' to quit.",
        source.describe()
    );
    let mut frame_count = 0u64;

    'ticks: loop {
        ticker.tick().await;

        if cycle_requested.swap(false, Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: cycling mode");
            render_loop.cycle_mode();
        }

        loop {
            match tui.handle_input()? {
                UiCommand::Continue => break,
                UiCommand::CycleMode => render_loop.cycle_mode(),
                UiCommand::ToggleRendering => render_loop.toggle_enabled(),
                UiCommand::Quit => break 'ticks,
            }
        }

        render_loop.tick(source, &mut tui)?;
        frame_count += 1;

        if source.finished() {
            tracing::info!("{} finished", source.describe());
            break;
        }
    }

    tracing::info!(
        "Render loop ended after {} frames in mode {}{}",
        frame_count,
        render_loop.mode(),
        if render_loop.is_enabled() { "" } else { " (paused)" }
    );
    tui.cleanup()
}
