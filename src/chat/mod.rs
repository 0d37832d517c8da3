//! Chat application module for interactive conversations with an agent
//! backend.
//!
//! This module provides a streaming REPL chat interface built on top of
//! the teamchat client library. It supports:
//!
//! - Streaming responses with real-time fragment display
//! - Dim activity lines naming which sub-agent is working
//! - Slash commands for session control
//! - Configurable backend URL and envelope identifiers
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and backend interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{CONNECT_ERROR_LINE, ChatSession, SessionStats};
