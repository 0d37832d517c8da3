// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod sse;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::AgentClient;
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use sse::process_sse;
pub use transcript::{AgentKind, Entry, RenderOp, Role, Transcript};
pub use types::*;
