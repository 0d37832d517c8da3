//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

/// Default application identifier; must match the backend's root agent.
const DEFAULT_APP_NAME: &str = "ResearchTeam";

/// Default user identifier.
const DEFAULT_USER_ID: &str = "user_123";

/// Default session identifier.
const DEFAULT_SESSION_ID: &str = "session_abc";

/// Command-line arguments for the teamchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the agent backend.
    #[arrrg(optional, "Agent backend base URL (default: http://127.0.0.1:8000/)", "URL")]
    pub base_url: Option<String>,

    /// Application identifier sent in the run envelope.
    #[arrrg(optional, "Application name (default: ResearchTeam)", "NAME")]
    pub app_name: Option<String>,

    /// User identifier sent in the run envelope.
    #[arrrg(optional, "User identifier (default: user_123)", "ID")]
    pub user: Option<String>,

    /// Session identifier sent in the run envelope.
    #[arrrg(optional, "Session identifier (default: session_abc)", "ID")]
    pub session: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 300)", "SECONDS")]
    pub timeout: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the agent backend; `None` lets the client choose its
    /// default (or the TEAMCHAT_BASE_URL environment variable).
    pub base_url: Option<String>,

    /// Application identifier sent in every run envelope.
    pub app_name: String,

    /// User identifier sent in every run envelope.
    pub user_id: String,

    /// Session identifier sent in every run envelope.
    pub session_id: String,

    /// Request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Path to persist transcripts automatically after each exchange.
    pub transcript_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults preserve the backend's expected identifiers: app
    /// `ResearchTeam`, user `user_123`, session `session_abc`.
    pub fn new() -> Self {
        Self {
            base_url: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            timeout: None,
            use_color: true,
            transcript_path: None,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the application identifier.
    pub fn with_app_name(mut self, app_name: String) -> Self {
        self.app_name = app_name;
        self
    }

    /// Sets the user identifier.
    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: String) -> Self {
        self.session_id = session_id;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the transcript auto-save path.
    pub fn with_transcript_path(mut self, path: Option<PathBuf>) -> Self {
        self.transcript_path = path;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.base_url,
            app_name: args.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            user_id: args.user.unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            session_id: args
                .session
                .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string()),
            timeout: args.timeout.map(|secs| Duration::from_secs(u64::from(secs))),
            use_color: !args.no_color,
            transcript_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.app_name, "ResearchTeam");
        assert_eq!(config.user_id, "user_123");
        assert_eq!(config.session_id, "session_abc");
        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert!(config.use_color);
        assert!(config.transcript_path.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            base_url: Some("https://agents.example.com/".to_string()),
            app_name: Some("OtherTeam".to_string()),
            user: Some("u_42".to_string()),
            session: Some("s_42".to_string()),
            timeout: Some(60),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.base_url.as_deref(), Some("https://agents.example.com/"));
        assert_eq!(config.app_name, "OtherTeam");
        assert_eq!(config.user_id, "u_42");
        assert_eq!(config.session_id, "s_42");
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://localhost:9000/".to_string())
            .with_app_name("Team".to_string())
            .with_user_id("u".to_string())
            .with_session_id("s".to_string())
            .with_timeout(Duration::from_secs(5))
            .without_color()
            .with_transcript_path(Some(PathBuf::from("transcript.json")));

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/"));
        assert_eq!(config.app_name, "Team");
        assert_eq!(config.user_id, "u");
        assert_eq!(config.session_id, "s");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(!config.use_color);
        assert_eq!(config.transcript_path, Some(PathBuf::from("transcript.json")));
    }
}
