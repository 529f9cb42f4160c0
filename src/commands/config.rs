//! Configuration file editor command.

use std::process::Command;

use crate::config::{get_config_path, LivespecConfig};

/// Opens the configuration file in the user's preferred editor.
///
/// Writes the defaults first when no file exists. Tries $EDITOR, then nano,
/// then vi. The edited file is loaded once more and problems are reported.
///
/// # Errors
/// - If the default file cannot be written
/// - If no editor can be found or executed
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        tracing::info!("Writing default config to {}", config_path.display());
        LivespecConfig::default().save_to(&config_path)?;
    }

    tracing::info!("Opening config file: {}", config_path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
            )
        })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    if let Err(e) = LivespecConfig::load_from(&config_path) {
        eprintln!("Warning: {e:#}");
        tracing::warn!("Edited config does not load: {:#}", e);
    } else {
        tracing::info!("Config file edited successfully");
    }
    Ok(())
}

/// Finds the editor to use: $EDITOR, nano, vi.
fn find_editor() -> anyhow::Result<String> {
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for editor in ["nano", "vi"] {
        if is_editor_available(editor) {
            return Ok(editor.to_string());
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Please set the $EDITOR environment variable."
    ))
}

/// Checks if an editor is available in the system PATH.
fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
