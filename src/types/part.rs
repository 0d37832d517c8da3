use serde::{Deserialize, Serialize};

/// A single text part within a message or event content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    /// The text content of the part.
    pub text: String,
}

impl Part {
    /// Creates a new Part with the specified text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
