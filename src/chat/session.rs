//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the client,
//! the envelope identifiers, and the transcript for one interaction, and
//! drives streaming exchanges with the backend.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};

use crate::chat::config::ChatConfig;
use crate::client::AgentClient;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::transcript::{Entry, Transcript};
use crate::types::RunRequest;

/// The single error line surfaced to the transcript on any top-level
/// failure of an exchange.
pub const CONNECT_ERROR_LINE: &str = "Error: Could not connect to the agent.";

/// A chat session against one agent backend.
///
/// The session owns its transcript and its in-flight stream: exchanges
/// take `&mut self`, so a new submission cannot overlap a running one,
/// and dropping the event stream on early exit abandons the transport.
pub struct ChatSession {
    client: AgentClient,
    config: ChatConfig,
    transcript: Transcript,
    exchange_count: u64,
    skipped_records: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The backend base URL.
    pub base_url: String,
    /// The application identifier.
    pub app_name: String,
    /// The user identifier.
    pub user_id: String,
    /// The session identifier.
    pub session_id: String,
    /// The number of transcript entries.
    pub entry_count: usize,
    /// The number of completed exchanges.
    pub exchange_count: u64,
    /// The number of malformed records skipped across all exchanges.
    pub skipped_records: u64,
    /// The auto-save transcript path, if set.
    pub transcript_path: Option<PathBuf>,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: AgentClient, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            transcript: Transcript::new(),
            exchange_count: 0,
            skipped_records: 0,
        }
    }

    /// Sends a user query and streams the response.
    ///
    /// This method:
    /// 1. Trims the input; empty input is a silent no-op with no request
    /// 2. Appends exactly one user entry to the transcript
    /// 3. Builds a fresh run envelope and POSTs it to the backend
    /// 4. Routes each streamed event through the transcript and renders
    ///    the resulting instructions
    ///
    /// Malformed records are skipped without aborting the exchange. On a
    /// top-level failure exactly one error line is appended to the
    /// transcript and the error returned; any partial answer already
    /// rendered stays in place.
    pub async fn send_streaming(
        &mut self,
        input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        if let Some(op) = self.transcript.push_user(input) {
            renderer.render(&op);
        }

        let request = RunRequest::user_query(
            &self.config.app_name,
            &self.config.user_id,
            &self.config.session_id,
            input,
        );

        let outcome = self.stream_exchange(&request, renderer).await;
        renderer.finish_exchange();

        match outcome {
            Ok(()) => {
                self.exchange_count += 1;
                // A failed auto-save is a local I/O problem, not a failed
                // exchange; report it without discarding the answer.
                if let Err(err) = self.auto_save_transcript() {
                    renderer.print_error(&format!("Failed to save transcript: {err}"));
                }
                Ok(())
            }
            Err(err) => {
                let op = self.transcript.push_error(CONNECT_ERROR_LINE);
                renderer.render(&op);
                Err(err)
            }
        }
    }

    async fn stream_exchange(
        &mut self,
        request: &RunRequest,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let mut events = self.client.run_sse(request).await?;

        while let Some(item) = events.next().await {
            if renderer.should_interrupt() {
                renderer.print_interrupted();
                // Dropping `events` abandons the transport.
                break;
            }
            match item {
                Ok(event) => {
                    for op in self.transcript.apply(&event) {
                        renderer.render(&op);
                    }
                }
                Err(err) if err.is_serialization() => {
                    // One malformed record; keep reading.
                    self.skipped_records += 1;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    /// Returns the transcript accumulated so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Clears the transcript.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Switches to a different session identifier.
    pub fn set_session_id(&mut self, session_id: String) {
        self.config.session_id = session_id;
    }

    /// Returns the current session identifier.
    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Switches to a different user identifier.
    pub fn set_user_id(&mut self, user_id: String) {
        self.config.user_id = user_id;
    }

    /// Returns the current user identifier.
    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    /// Sets the auto-save transcript path.
    pub fn set_transcript_path(&mut self, path: Option<PathBuf>) {
        self.config.transcript_path = path;
    }

    /// Returns the configured transcript path, if any.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.config.transcript_path.as_deref()
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(self.transcript.entries());
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    /// Loads a transcript from disk, replacing the current one.
    pub fn load_transcript_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open transcript file", err))?;
        let reader = BufReader::new(file);
        let transcript: TranscriptFile = from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse transcript", Some(Box::new(err)))
        })?;
        self.transcript.replace_entries(transcript.entries);
        Ok(())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            base_url: self.client.base_url().to_string(),
            app_name: self.config.app_name.clone(),
            user_id: self.config.user_id.clone(),
            session_id: self.config.session_id.clone(),
            entry_count: self.transcript.len(),
            exchange_count: self.exchange_count,
            skipped_records: self.skipped_records,
            transcript_path: self.config.transcript_path.clone(),
        }
    }

    fn auto_save_transcript(&self) -> Result<()> {
        if let Some(path) = &self.config.transcript_path {
            self.save_transcript_to(path)
        } else {
            Ok(())
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    entries: Vec<Entry>,
}

impl TranscriptFile {
    fn new(entries: &[Entry]) -> Self {
        Self {
            version: 1,
            entries: entries.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Role;

    fn test_session() -> ChatSession {
        let client = AgentClient::new(Some("http://127.0.0.1:8000/".to_string())).unwrap();
        ChatSession::new(client, ChatConfig::default())
    }

    #[test]
    fn new_session_empty() {
        let session = test_session();
        assert!(session.transcript().is_empty());
        assert_eq!(session.session_id(), "session_abc");
        assert_eq!(session.user_id(), "user_123");
    }

    #[test]
    fn clear_session() {
        let mut session = test_session();
        session.transcript.push_user("test");
        assert_eq!(session.transcript().len(), 1);

        session.clear();
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn switch_identifiers() {
        let mut session = test_session();
        session.set_session_id("session_xyz".to_string());
        session.set_user_id("user_456".to_string());
        assert_eq!(session.session_id(), "session_xyz");
        assert_eq!(session.user_id(), "user_456");
    }

    #[test]
    fn transcript_save_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("teamchat-test-{}.json", std::process::id()));

        let mut session = test_session();
        session.transcript.push_user("hello");
        session.transcript.push_error("Error: Could not connect to the agent.");
        session.save_transcript_to(&path).unwrap();

        let mut restored = test_session();
        restored.load_transcript_from(&path).unwrap();
        assert_eq!(restored.transcript().len(), 2);
        assert_eq!(restored.transcript().entries()[0].role, Role::User);
        assert_eq!(restored.transcript().entries()[0].text, "hello");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let mut session = test_session();
        let mut renderer = crate::render::PlainTextRenderer::with_color(false);

        // No request is made, so this succeeds even without a backend.
        session.send_streaming("   ", &mut renderer).await.unwrap();
        assert!(session.transcript().is_empty());
    }
}
