use serde::{Deserialize, Serialize};

use crate::types::Part;

/// Content attached to an agent event.
///
/// The backend sends either a bare string (ad-hoc activity text) or a
/// parts object carrying answer fragments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventContent {
    /// Plain activity text.
    Text(String),

    /// Structured content parts.
    Parts(PartsContent),
}

/// The parts form of event content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartsContent {
    /// The content parts; the first part's text is the answer fragment.
    pub parts: Vec<Part>,
}

/// One event parsed from the `/run_sse` stream.
///
/// Events are transient: each is routed to the transcript and dropped.
/// All fields are optional on the wire; absent fields deserialize to
/// their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentEvent {
    /// Name of the sub-agent that produced the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Whether this event carries user-facing answer text.
    #[serde(default)]
    pub is_final_response: bool,

    /// Content attached to the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<EventContent>,
}

impl AgentEvent {
    /// Returns the answer fragment for a final-response event, if present.
    ///
    /// Non-final events, events without content, and events whose content
    /// is a bare string all return `None`.
    pub fn final_text(&self) -> Option<&str> {
        if !self.is_final_response {
            return None;
        }
        match &self.content {
            Some(EventContent::Parts(content)) => {
                content.parts.first().map(|part| part.text.as_str())
            }
            _ => None,
        }
    }

    /// Returns the content as ad-hoc activity text, if it is a bare string.
    pub fn activity_text(&self) -> Option<&str> {
        match &self.content {
            Some(EventContent::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_activity_event() {
        let json = r#"{"author":"ResearcherAgent","is_final_response":false}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.author.as_deref(), Some("ResearcherAgent"));
        assert!(!event.is_final_response);
        assert!(event.content.is_none());
        assert!(event.final_text().is_none());
    }

    #[test]
    fn deserialize_final_event() {
        let json = r#"{"is_final_response":true,"content":{"parts":[{"text":"Hello"}]}}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_final_response);
        assert_eq!(event.final_text(), Some("Hello"));
    }

    #[test]
    fn deserialize_string_content() {
        let json = r#"{"author":"ResearchManager","content":"Booting research loop"}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.activity_text(), Some("Booting research loop"));
        assert!(event.final_text().is_none());
    }

    #[test]
    fn missing_fields_default() {
        let event: AgentEvent = serde_json::from_str("{}").unwrap();
        assert!(event.author.is_none());
        assert!(!event.is_final_response);
        assert!(event.content.is_none());
    }

    #[test]
    fn final_without_parts_has_no_text() {
        let json = r#"{"is_final_response":true,"content":"just a string"}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        assert!(event.final_text().is_none());
    }

    #[test]
    fn final_with_empty_parts_has_no_text() {
        let json = r#"{"is_final_response":true,"content":{"parts":[]}}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        assert!(event.final_text().is_none());
    }
}
