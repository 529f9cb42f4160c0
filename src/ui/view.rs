//! Draws the intensity buffer onto terminal cells.
//!
//! Each cell shows two pixel rows with an upper half block: the foreground is
//! the upper pixel, the background the lower one. The buffer's bottom row ends
//! up on the last terminal row of the area.

use ratatui::{
    layout::Alignment,
    prelude::*,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::palette::Palette;
use crate::visualizer::{PixelBuffer, Scene};

/// Text shown while the input is quiet.
pub const SILENCE_PROMPT: &str = "make some noise!";

/// Rows reserved for the status line.
pub const FOOTER_HEIGHT: u16 = 1;

const HALF_BLOCK: char = '▀';

/// Widget rendering a pixel buffer through a palette.
pub struct SpectrumView<'a> {
    buffer: &'a PixelBuffer,
    palette: &'a Palette,
}

impl<'a> SpectrumView<'a> {
    pub fn new(buffer: &'a PixelBuffer, palette: &'a Palette) -> Self {
        Self { buffer, palette }
    }
}

impl Widget for SpectrumView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.buffer.height();
        let columns = area.width.min(self.buffer.width().min(u16::MAX as usize) as u16);

        for row in 0..area.height {
            let upper = 2 * row as usize;
            if upper >= height {
                break;
            }
            let top = height - 1 - upper;
            let bottom = top.checked_sub(1);

            for col in 0..columns {
                let fg = self.palette[self.buffer.get(col as usize, top) as usize];
                let bg = bottom
                    .map(|y| self.palette[self.buffer.get(col as usize, y) as usize])
                    .unwrap_or(Color::Rgb(0, 0, 0));

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK).set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

/// Lays out one frame: the buffer, the silence prompt over it, the footer.
pub fn draw_scene(frame: &mut Frame, scene: &Scene<'_>, palette: &Palette) {
    let area = frame.area();
    let footer_height = FOOTER_HEIGHT.min(area.height);

    let view_area = Rect {
        height: area.height - footer_height,
        ..area
    };
    let footer_area = Rect {
        y: area.y + view_area.height,
        height: footer_height,
        ..area
    };

    frame.render_widget(SpectrumView::new(scene.buffer, palette), view_area);

    if scene.show_silence_prompt && view_area.height > 0 {
        let prompt_area = Rect {
            y: view_area.y + view_area.height / 2,
            height: 1,
            ..view_area
        };
        // only the glyph cells turn white; the rest of the row keeps its pixels
        let prompt = Paragraph::new(Span::styled(
            SILENCE_PROMPT,
            Style::default().fg(Color::Rgb(255, 255, 255)),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(prompt, prompt_area);
    }

    let indicator = if scene.rendering_enabled {
        Span::styled("● ", Style::default().fg(Color::Red))
    } else {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    };

    let footer = Paragraph::new(Line::from(vec![
        indicator,
        Span::raw(scene.mode.to_string()),
        Span::raw(" / "),
        Span::raw(scene.source),
        Span::styled(
            "  click: mode  p: pause  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .style(
        Style::default()
            .fg(Color::Rgb(185, 207, 212))
            .bg(Color::Rgb(0, 0, 0)),
    );

    frame.render_widget(footer, footer_area);
}
