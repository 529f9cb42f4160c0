//! Audio input for the display.
//!
//! Sources deliver mono 16-bit samples; `analysis` turns them into the blocks
//! and level readings the renderer consumes.

pub mod analysis;
pub mod live;
pub mod wav;

pub use live::{list_input_devices, LiveCapture};
pub use wav::WavSource;
