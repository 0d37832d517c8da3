use serde::{Deserialize, Serialize};

use crate::types::Part;

/// Role type for an outbound message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The message comes from the user.
    User,
}

/// The message carried by a run request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    /// The role of the message, always `user` for client submissions.
    pub role: MessageRole,

    /// The message content parts.
    pub parts: Vec<Part>,
}

impl NewMessage {
    /// Creates a user message with a single text part.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![Part::new(text)],
        }
    }
}

/// Initial session state sent with a run request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunState {
    /// The question the user asked, seeded into agent state.
    pub user_question: String,
}

/// The envelope posted to `/run_sse` to start an agent run.
///
/// Constructed fresh per submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRequest {
    /// Application identifier; must match the backend's root agent name.
    pub app_name: String,

    /// User identifier for the session store.
    pub user_id: String,

    /// Session identifier for the session store.
    pub session_id: String,

    /// The user's message.
    pub new_message: NewMessage,

    /// Initial state for the run.
    pub state: RunState,
}

impl RunRequest {
    /// Creates a run request for a single user query.
    ///
    /// The query text is carried both as the message and as the
    /// `user_question` state seed, matching what the backend expects.
    pub fn user_query(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        let query = query.into();
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            new_message: NewMessage::user(query.clone()),
            state: RunState {
                user_question: query,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn envelope_serialization() {
        let request =
            RunRequest::user_query("ResearchTeam", "user_123", "session_abc", "What is Rust?");
        let json = to_value(&request).unwrap();

        assert_eq!(
            json,
            json!({
                "app_name": "ResearchTeam",
                "user_id": "user_123",
                "session_id": "session_abc",
                "new_message": {
                    "role": "user",
                    "parts": [{"text": "What is Rust?"}]
                },
                "state": {"user_question": "What is Rust?"}
            })
        );
    }

    #[test]
    fn query_seeds_state() {
        let request = RunRequest::user_query("app", "u", "s", "hello");
        assert_eq!(request.state.user_question, "hello");
        assert_eq!(request.new_message.parts[0].text, "hello");
    }
}
