//! Command-line interface for parley.
//!
//! This module provides:
//! - Argument parsing
//! - Version and usage display
//! - Slash command parsing for the interactive prompt
//! - The interactive loop itself
//!
//! # Usage
//!
//! ```ignore
//! use parley::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     return result;
//! }
//! // No one-shot command, start the interactive loop
//! ```

pub mod args;
pub mod command;
pub mod repl;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use command::{parse_input, CommandError, Input, SlashCommand};
pub use repl::Flow;
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a one-shot CLI command if applicable.
///
/// # Returns
///
/// * `None` - If the command is `Run` (no one-shot action)
/// * `Some(Ok(()))` - If the command printed its output
/// * `Some(Err(e))` - If the arguments were invalid
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::Invalid(reason) => Some(Err(eyre!("{}\n\n{}", reason, USAGE))),
        CliCommand::Run { .. } => None,
    }
}
