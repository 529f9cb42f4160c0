//! Terminal presentation: palette, buffer widget, the full-screen presenter
//! and the startup error screen.

pub mod error;
pub mod palette;
pub mod tui;
pub mod view;

pub use error::ErrorScreen;
pub use tui::{LivespecTui, UiCommand};
