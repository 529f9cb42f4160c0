//! Application orchestration and command routing.
//!
//! Parses the command line and delegates to the command handlers.

use crate::commands;
use crate::logging;
use crate::visualizer::RenderMode;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A live audio spectrum analyser for the terminal
#[derive(Parser, Debug)]
#[command(name = "livespec")]
#[command(version)]
#[command(about = "Live audio spectrum analyser for the terminal")]
#[command(long_about = "Live audio spectrum analyser for the terminal.\n\nShows the input as a linear spectrum, 28 logarithmic bands, a scrolling\nspectrogram or a waveform. Click (or press Space) to switch display,\n'p' to pause, 'q' to quit. Sending SIGUSR1 also switches display.\n\nDEFAULT COMMAND:\n    If no command is specified, 'run' is used by default.\n\nEXAMPLES:\n    # Visualize the default input device\n    $ livespec\n\n    # Start in the scrolling display on device #2\n    $ livespec --mode scrolling-spectrum --device 2\n\n    # Visualize a WAV file, looping\n    $ livespec play song.wav --loop\n\n    # Switch display from another terminal\n    $ pkill -USR1 livespec")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/livespec/livespec.toml\n    Logs:               ~/.local/state/livespec/livespec.log.*"
)]
struct Cli {
    /// Display mode to start in (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    mode: Option<RenderMode>,

    /// Input device: "default", an ID or a name from list-devices (overrides the config file)
    #[arg(short, long, value_name = "DEVICE", global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Visualize live input from an audio device (default)
    #[command(visible_alias = "r")]
    Run,

    /// Visualize a WAV file at real-time pace
    ///
    /// The file is not played back through the speakers.
    #[command(visible_alias = "p")]
    Play {
        /// Path to the WAV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Start over at the end of the file instead of exiting
        #[arg(short, long = "loop")]
        looping: bool,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Writes the default configuration first if none exists.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   livespec completions bash > livespec.bash
    ///   livespec completions zsh > _livespec
    ///   livespec completions fish > livespec.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // commands that print to the terminal need neither logging nor config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "livespec", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return exit_on_error(commands::handle_list_devices()),
        Some(Commands::Logs) => return exit_on_error(commands::handle_logs()),
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Run) => commands::handle_run(cli.mode, cli.device).await?,
        Some(Commands::Play { file, looping }) => {
            if cli.device.is_some() {
                tracing::warn!("--device is ignored when playing a file");
            }
            commands::handle_play(file, looping, cli.mode).await?;
        }
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. } | Commands::ListDevices | Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

fn exit_on_error(result: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    Ok(())
}
