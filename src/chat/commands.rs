//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending queries
//! to the backend.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the transcript.
    Clear,

    /// Switch to a different session identifier.
    Session(String),

    /// Switch to a different user identifier.
    User(String),

    /// Set the auto-save transcript path.
    TranscriptPath(String),

    /// Clear the auto-save transcript path.
    ClearTranscriptPath,

    /// Save the transcript to a specific file immediately.
    SaveTranscript(String),

    /// Load a transcript from a file.
    LoadTranscript(String),

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular query.
///
/// # Examples
///
/// ```
/// # use teamchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/session session_xyz").is_some());
/// assert!(parse_command("What is Rust?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "session" => match argument {
            Some(id) => ChatCommand::Session(id.to_string()),
            None => ChatCommand::Invalid("/session requires a session id".to_string()),
        },
        "user" => match argument {
            Some(id) => ChatCommand::User(id.to_string()),
            None => ChatCommand::Invalid("/user requires a user id".to_string()),
        },
        "transcript" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("clear") => ChatCommand::ClearTranscriptPath,
            Some(arg) => ChatCommand::TranscriptPath(arg.to_string()),
            None => ChatCommand::Invalid("/transcript requires a file path".to_string()),
        },
        "save" => match argument {
            Some(arg) => ChatCommand::SaveTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "load" => match argument {
            Some(arg) => ChatCommand::LoadTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/load requires a file path".to_string()),
        },
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear the transcript
  /session <id>          Switch to a different session id
  /user <id>             Switch to a different user id
  /transcript <file>     Enable auto-saving transcripts (or 'clear')
  /save <file>           Save the current transcript immediately
  /load <file>           Load a transcript from disk
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
