//! Signal-to-pixel core.
//!
//! Converts one audio block per tick into 8-bit intensities in a fixed-size
//! buffer, in one of four display modes, and decides when to prompt the user
//! because the input has gone quiet.

pub mod bands;
pub mod block;
pub mod buffer;
pub mod mode;
pub mod render_loop;
pub mod renderer;
pub mod silence;

pub use block::{AudioBlock, BlockKind, SpectrumBins, FFT_BINS};
pub use buffer::{align_width, PixelBuffer};
pub use mode::RenderMode;
pub use render_loop::{AudioSource, Presenter, RenderLoop, Scene};
pub use renderer::SpectrumRenderer;
pub use silence::{SilenceConfig, SilenceMonitor};
