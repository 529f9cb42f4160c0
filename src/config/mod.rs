//! Configuration management for livespec.
//!
//! Loads and saves the TOML settings file in the user's config directory.

pub mod file;

pub use file::{get_config_path, AudioConfig, DisplayConfig, LivespecConfig};
