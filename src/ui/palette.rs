//! 256-entry color table for the intensity buffer.
//!
//! Index 0 is black background. 1..=127 fade from green to red for bars and
//! traces. 128..=255 run black, blue, magenta, red, orange, yellow and finally
//! white for the scrolling history, so the time marker (255) stands out.

use ratatui::style::Color;

pub type Palette = [Color; 256];

/// Builds the palette.
pub fn build() -> Palette {
    let mut rgb = [(0u8, 0u8, 0u8); 256];

    for a in 1..128usize {
        rgb[a] = ((2 * a) as u8, (256 - 2 * a) as u8, 0);
    }

    for a in 0..32usize {
        let ramp = (8 * a) as u8;
        let fall = (8 * (31 - a)) as u8;
        rgb[128 + a] = (0, 0, ramp);
        rgb[160 + a] = (ramp, 0, 255);
        rgb[192 + a] = (255, ramp, fall);
        rgb[224 + a] = (255, 255, ramp);
    }

    rgb.map(|(r, g, b)| Color::Rgb(r, g, b))
}
