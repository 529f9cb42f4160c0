//! Full-screen terminal presenter for the spectrum display.
//!
//! Mouse clicks and keys are read without blocking so the render loop keeps
//! its pace.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;

use super::palette::{self, Palette};
use super::view::{self, FOOTER_HEIGHT};
use crate::visualizer::{Presenter, Scene};

/// User input command read between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Nothing to do (no event, or an ignored one)
    Continue,
    /// Switch to the next display mode (click, Space, Enter or 'm')
    CycleMode,
    /// Pause or resume rendering ('p')
    ToggleRendering,
    /// Leave the visualizer ('q', Escape or Ctrl+C)
    Quit,
}

/// Terminal UI owning the alternate screen while the visualizer runs.
pub struct LivespecTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    palette: Palette,
}

impl LivespecTui {
    /// Enters raw mode and the alternate screen and enables mouse reporting.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            palette: palette::build(),
        })
    }

    /// Pixel dimensions the terminal can show: one column per cell, two rows
    /// per cell above the footer.
    ///
    /// # Errors
    /// - If the terminal size cannot be read
    pub fn pixel_size(&self) -> anyhow::Result<(usize, usize)> {
        let size = self.terminal.size()?;
        Ok(pixel_size_for(size.width, size.height))
    }

    /// Drains pending terminal events until one maps to a command.
    ///
    /// Call repeatedly until it returns `Continue` to consume everything
    /// queued since the last tick.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<UiCommand> {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            let command = command_for(&event);
            if command != UiCommand::Continue {
                return Ok(command);
            }
        }
        Ok(UiCommand::Continue)
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Presenter for LivespecTui {
    fn present(&mut self, scene: &Scene<'_>) -> anyhow::Result<()> {
        let palette = &self.palette;
        self.terminal
            .draw(|frame| view::draw_scene(frame, scene, palette))?;
        Ok(())
    }
}

impl Drop for LivespecTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn pixel_size_for(columns: u16, rows: u16) -> (usize, usize) {
    let width = (columns as usize).max(1);
    let height = (rows.saturating_sub(FOOTER_HEIGHT) as usize).max(1) * 2;
    (crate::visualizer::align_width(width), height)
}

fn command_for(event: &Event) -> UiCommand {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => command_for_key(key),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Up(MouseButton::Left) => {
            tracing::debug!("Click at {},{}: next mode", mouse.column, mouse.row);
            UiCommand::CycleMode
        }
        Event::Resize(columns, rows) => {
            // the pixel buffer keeps its size until restart
            tracing::debug!("Terminal resized to {}x{}", columns, rows);
            UiCommand::Continue
        }
        _ => UiCommand::Continue,
    }
}

fn command_for_key(key: &KeyEvent) -> UiCommand {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            tracing::debug!("Ctrl+C pressed: quitting");
            UiCommand::Quit
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            tracing::debug!("Escape or 'q' pressed: quitting");
            UiCommand::Quit
        }
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('m') => UiCommand::CycleMode,
        KeyCode::Char('p') => UiCommand::ToggleRendering,
        _ => UiCommand::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_click_cycles_mode() {
        assert_eq!(
            command_for(&mouse(MouseEventKind::Up(MouseButton::Left))),
            UiCommand::CycleMode
        );
        assert_eq!(
            command_for(&mouse(MouseEventKind::Down(MouseButton::Left))),
            UiCommand::Continue
        );
        assert_eq!(
            command_for(&mouse(MouseEventKind::Up(MouseButton::Right))),
            UiCommand::Continue
        );
    }

    #[test]
    fn test_keys() {
        assert_eq!(command_for(&key(KeyCode::Char(' '))), UiCommand::CycleMode);
        assert_eq!(command_for(&key(KeyCode::Enter)), UiCommand::CycleMode);
        assert_eq!(command_for(&key(KeyCode::Char('p'))), UiCommand::ToggleRendering);
        assert_eq!(command_for(&key(KeyCode::Char('q'))), UiCommand::Quit);
        assert_eq!(command_for(&key(KeyCode::Esc)), UiCommand::Quit);
        assert_eq!(command_for(&key(KeyCode::Char('x'))), UiCommand::Continue);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(command_for(&ctrl_c), UiCommand::Quit);
        assert_eq!(command_for(&key(KeyCode::Char('c'))), UiCommand::Continue);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(command_for(&Event::Key(release)), UiCommand::Continue);
    }

    #[test]
    fn test_resize_is_ignored() {
        assert_eq!(command_for(&Event::Resize(100, 40)), UiCommand::Continue);
    }

    #[test]
    fn test_pixel_size() {
        // 81 columns round up to 84; 25 rows less the footer give 48 pixel rows
        assert_eq!(pixel_size_for(81, 25), (84, 48));
        assert_eq!(pixel_size_for(80, 1), (80, 2));
        assert_eq!(pixel_size_for(0, 0), (4, 2));
    }
}
