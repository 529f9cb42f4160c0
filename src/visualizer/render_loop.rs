//! Per-tick orchestration: poll audio, render, track silence, present.

use super::block::{AudioBlock, BlockKind};
use super::buffer::PixelBuffer;
use super::mode::RenderMode;
use super::renderer::SpectrumRenderer;
use super::silence::{SilenceConfig, SilenceMonitor};
use crate::capture::analysis::{self, BlockAnalyzer};

/// Supplies the newest mono samples once per tick.
pub trait AudioSource {
    /// Returns the newest `count` samples (fewer if the history is shorter).
    ///
    /// Called exactly once per tick; sources that play back at their own pace
    /// advance by one tick here.
    fn poll(&mut self, count: usize) -> Vec<i16>;

    fn sample_rate(&self) -> u32;

    /// Short human-readable name for the footer.
    fn describe(&self) -> String;

    /// Whether the source has run out of audio.
    fn finished(&self) -> bool {
        false
    }
}

/// What a presenter shows after a tick.
pub struct Scene<'a> {
    pub buffer: &'a PixelBuffer,
    pub mode: RenderMode,
    pub show_silence_prompt: bool,
    pub rendering_enabled: bool,
    pub source: &'a str,
}

/// Displays the buffer. Only reads it, after rendering has finished.
pub trait Presenter {
    fn present(&mut self, scene: &Scene<'_>) -> anyhow::Result<()>;
}

/// Owns everything that lives across ticks.
pub struct RenderLoop {
    renderer: SpectrumRenderer,
    silence: SilenceMonitor,
    analyzer: BlockAnalyzer,
    mode: RenderMode,
    enabled: bool,
}

impl RenderLoop {
    pub fn new(width: usize, height: usize, mode: RenderMode, silence: SilenceConfig) -> Self {
        let renderer = SpectrumRenderer::new(width, height);
        tracing::debug!(
            "Render loop created: {}x{} pixels, mode {}",
            renderer.buffer().width(),
            renderer.buffer().height(),
            mode
        );
        Self {
            renderer,
            silence: SilenceMonitor::new(silence),
            analyzer: BlockAnalyzer::new(),
            mode,
            enabled: true,
        }
    }

    /// Runs one tick.
    ///
    /// # Errors
    /// - If the presenter fails to display the frame
    pub fn tick(
        &mut self,
        source: &mut dyn AudioSource,
        presenter: &mut dyn Presenter,
    ) -> anyhow::Result<()> {
        if self.enabled {
            let width = self.renderer.buffer().width();
            let sample_rate = source.sample_rate();
            let samples = source.poll(analysis::required_history(width, sample_rate));

            let block = match self.mode.block_kind() {
                BlockKind::Waveform => AudioBlock::Waveform(analysis::waveform(&samples, width)),
                BlockKind::Spectrum => AudioBlock::Spectrum(self.analyzer.spectrum(&samples)),
            };
            self.renderer.render(self.mode, &block);
            self.silence
                .on_tick(analysis::peak_level(&samples, sample_rate));
        }

        let description = source.describe();
        presenter.present(&Scene {
            buffer: self.renderer.buffer(),
            mode: self.mode,
            show_silence_prompt: self.enabled && self.silence.should_show_overlay(),
            rendering_enabled: self.enabled,
            source: &description,
        })
    }

    /// Switches to the next mode and clears the display.
    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    /// Switches mode and clears the display.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        self.renderer.clear();
        tracing::info!("Display mode: {}", mode);
    }

    /// Pauses or resumes rendering. The last frame stays on screen while paused.
    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.silence.reset();
        }
        tracing::info!(
            "Rendering {}",
            if self.enabled { "resumed" } else { "paused" }
        );
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn buffer(&self) -> &PixelBuffer {
        self.renderer.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantSource {
        value: i16,
        polls: usize,
    }

    impl AudioSource for ConstantSource {
        fn poll(&mut self, count: usize) -> Vec<i16> {
            self.polls += 1;
            vec![self.value; count]
        }

        fn sample_rate(&self) -> u32 {
            48000
        }

        fn describe(&self) -> String {
            "constant".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        frames: Vec<(Vec<u8>, RenderMode, bool)>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, scene: &Scene<'_>) -> anyhow::Result<()> {
            self.frames.push((
                scene.buffer.pixels().to_vec(),
                scene.mode,
                scene.show_silence_prompt,
            ));
            Ok(())
        }
    }

    fn loud_chirp() -> impl AudioSource {
        struct Chirp;
        impl AudioSource for Chirp {
            fn poll(&mut self, count: usize) -> Vec<i16> {
                (0..count)
                    .map(|i| if (i / 32) % 2 == 0 { 20000 } else { -20000 })
                    .collect()
            }
            fn sample_rate(&self) -> u32 {
                48000
            }
            fn describe(&self) -> String {
                "chirp".to_string()
            }
        }
        Chirp
    }

    #[test]
    fn test_waveform_tick_draws_flat_trace() {
        let mut render_loop =
            RenderLoop::new(32, 10, RenderMode::Waveform, SilenceConfig::default());
        let mut source = ConstantSource {
            value: 32767,
            polls: 0,
        };
        let mut presenter = RecordingPresenter::default();
        render_loop.tick(&mut source, &mut presenter).unwrap();

        assert_eq!(source.polls, 1);
        let buffer = render_loop.buffer();
        assert!(buffer.row(0).iter().all(|&p| p == 128));
        assert_eq!(presenter.frames.len(), 1);
        assert_eq!(presenter.frames[0].0, buffer.pixels());
    }

    #[test]
    fn test_mode_round_trip_clears_both_ways() {
        let mut render_loop =
            RenderLoop::new(64, 16, RenderMode::LinearSpectrum, SilenceConfig::default());
        let mut source = loud_chirp();
        let mut presenter = RecordingPresenter::default();
        render_loop.tick(&mut source, &mut presenter).unwrap();
        assert!(render_loop.buffer().pixels().iter().any(|&p| p != 0));

        render_loop.cycle_mode();
        assert_eq!(render_loop.mode(), RenderMode::BandedSpectrum);
        assert!(render_loop.buffer().pixels().iter().all(|&p| p == 0));

        for _ in 0..3 {
            render_loop.cycle_mode();
        }
        assert_eq!(render_loop.mode(), RenderMode::LinearSpectrum);
        assert!(render_loop.buffer().pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_quiet_source_raises_prompt() {
        let mut render_loop =
            RenderLoop::new(8, 4, RenderMode::BandedSpectrum, SilenceConfig::default());
        let mut source = ConstantSource { value: 0, polls: 0 };
        let mut presenter = RecordingPresenter::default();
        for _ in 0..48 {
            render_loop.tick(&mut source, &mut presenter).unwrap();
        }
        let prompts: Vec<bool> = presenter.frames.iter().map(|f| f.2).collect();
        assert!(prompts[..47].iter().all(|&p| !p));
        assert!(prompts[47]);
    }

    #[test]
    fn test_paused_loop_presents_without_polling() {
        let mut render_loop =
            RenderLoop::new(8, 4, RenderMode::ScrollingSpectrum, SilenceConfig::default());
        let mut source = ConstantSource { value: 0, polls: 0 };
        let mut presenter = RecordingPresenter::default();
        render_loop.tick(&mut source, &mut presenter).unwrap();
        let before = render_loop.buffer().clone();

        render_loop.toggle_enabled();
        assert!(!render_loop.is_enabled());
        for _ in 0..60 {
            render_loop.tick(&mut source, &mut presenter).unwrap();
        }
        assert_eq!(source.polls, 1);
        assert_eq!(render_loop.buffer(), &before);
        assert!(presenter.frames.iter().all(|f| !f.2));
    }
}
