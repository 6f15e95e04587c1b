//! Slash command definitions and parsing.
//!
//! Lines typed at the prompt that start with `/` are commands; every other
//! non-empty line is sent as a message.

use thiserror::Error;

/// Commands available at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Start a new conversation
    /// Primary: /new
    /// Aliases: /clear
    New,

    /// List conversations
    /// Primary: /list
    /// Aliases: /ls
    List,

    /// Make another conversation active
    /// Primary: /switch <id>
    Switch(String),

    /// Delete a conversation
    /// Primary: /delete <id>
    /// Aliases: /rm
    Delete(String),

    /// Rename a conversation
    /// Primary: /rename <id> <name>
    Rename { id: String, name: String },

    /// Stop the in-flight response
    /// Primary: /stop
    Stop,

    /// Show server metrics
    /// Primary: /metrics
    Metrics,

    /// Show help
    /// Primary: /help
    /// Aliases: /?
    Help,

    /// Leave the session
    /// Primary: /quit
    /// Aliases: /exit, /q
    Quit,
}

/// Why a slash command could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("usage: {0}")]
    MissingArgument(&'static str),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line
    Empty,
    /// Text to send to the server
    Message(String),
    /// A slash command
    Command(SlashCommand),
}

impl SlashCommand {
    /// Parse a slash command.
    ///
    /// Accepts the command with or without the leading `/`. The command word
    /// is matched case-insensitively; arguments are kept as typed.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::cli::command::SlashCommand;
    ///
    /// assert_eq!(SlashCommand::parse("/new"), Ok(SlashCommand::New));
    /// assert_eq!(
    ///     SlashCommand::parse("/switch default"),
    ///     Ok(SlashCommand::Switch("default".to_string()))
    /// );
    /// assert!(SlashCommand::parse("/unknown").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim().trim_start_matches('/');
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        match word.to_lowercase().as_str() {
            "new" | "clear" => Ok(SlashCommand::New),
            "list" | "ls" => Ok(SlashCommand::List),
            "switch" => single_arg(rest, "/switch <id>").map(SlashCommand::Switch),
            "delete" | "rm" => single_arg(rest, "/delete <id>").map(SlashCommand::Delete),
            "rename" => {
                const USAGE: &str = "/rename <id> <name>";
                let (id, name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument(USAGE))?;
                Ok(SlashCommand::Rename {
                    id: id.to_string(),
                    name: name.trim().to_string(),
                })
            }
            "stop" => Ok(SlashCommand::Stop),
            "metrics" => Ok(SlashCommand::Metrics),
            "help" | "?" => Ok(SlashCommand::Help),
            "quit" | "exit" | "q" => Ok(SlashCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Get the primary name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            SlashCommand::New => "/new",
            SlashCommand::List => "/list",
            SlashCommand::Switch(_) => "/switch",
            SlashCommand::Delete(_) => "/delete",
            SlashCommand::Rename { .. } => "/rename",
            SlashCommand::Stop => "/stop",
            SlashCommand::Metrics => "/metrics",
            SlashCommand::Help => "/help",
            SlashCommand::Quit => "/quit",
        }
    }
}

fn single_arg(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(usage))
    } else {
        Ok(rest.to_string())
    }
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  /new                  Start a new conversation
  /list                 List conversations (* marks the active one)
  /switch <id>          Switch to a conversation
  /delete <id>          Delete a conversation
  /rename <id> <name>   Rename a conversation
  /stop                 Stop the current response (or press Ctrl+C)
  /metrics              Show server metrics
  /help                 Show this help
  /quit                 Exit";

/// Classify one line of input.
pub fn parse_input(line: &str) -> Result<Input, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(Input::Empty)
    } else if trimmed.starts_with('/') {
        SlashCommand::parse(trimmed).map(Input::Command)
    } else {
        Ok(Input::Message(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
