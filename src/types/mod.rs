//! Wire types for the `/run_sse` agent endpoint.
//!
//! The outbound envelope and inbound event shapes match the JSON the
//! backend speaks; all keys are snake_case on the wire.

mod agent_event;
mod part;
mod run_request;

pub use agent_event::{AgentEvent, EventContent, PartsContent};
pub use part::Part;
pub use run_request::{MessageRole, NewMessage, RunRequest, RunState};
