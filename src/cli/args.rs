//! Command-line argument parsing for the parley binary.

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: parley [OPTIONS]

Chat with a streaming generation server from the terminal.

Options:
  --url <URL>      Server base URL (overrides PARLEY_URL)
  -h, --help       Print this help
  -V, --version    Print version

Type a line to send it. Type /help inside the session for commands.";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the interactive session (default)
    Run {
        /// Base URL override from `--url`
        url: Option<String>,
    },
    /// Arguments could not be understood
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name and is skipped. `--version` and
/// `--help` win over everything else; unknown flags are reported as
/// [`CliCommand::Invalid`].
///
/// # Examples
///
/// ```
/// use parley::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["parley".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut url = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--url" => match args.next() {
                Some(value) if !value.starts_with('-') => url = Some(value),
                _ => return CliCommand::Invalid("--url requires a value".to_string()),
            },
            other => {
                if let Some(value) = other.strip_prefix("--url=") {
                    if value.is_empty() {
                        return CliCommand::Invalid("--url requires a value".to_string());
                    }
                    url = Some(value.to_string());
                } else {
                    return CliCommand::Invalid(format!("unknown argument: {}", other));
                }
            }
        }
    }

    CliCommand::Run { url }
}
