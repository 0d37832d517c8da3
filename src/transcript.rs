//! Pure event routing for chat transcripts.
//!
//! Routing is a function from (current transcript, new event) to render
//! instructions; the side-effecting display step lives in [`crate::render`].
//! Each [`Transcript`] owns its open-bubble handle, so there is no shared
//! state between interactions.

use serde::{Deserialize, Serialize};

use crate::types::AgentEvent;

/// The role tag of a transcript entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A message typed by the user.
    User,
    /// A transient status line naming which sub-agent is working.
    AgentActivity,
    /// A final-answer bubble accumulating streamed fragments.
    AgentMessage,
}

/// One rendered line of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The role tag controlling how the entry is displayed.
    pub role: Role,
    /// The entry text. Only `AgentMessage` entries ever grow after
    /// creation.
    pub text: String,
}

/// A render instruction produced by routing one event.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// A new entry was appended at `index`.
    Append {
        /// Index of the new entry.
        index: usize,
        /// Role of the new entry.
        role: Role,
        /// Initial text of the new entry.
        text: String,
    },
    /// Text was appended to the message entry at `index`.
    ExtendMessage {
        /// Index of the extended entry.
        index: usize,
        /// The appended fragment.
        text: String,
    },
}

/// The known sub-agents of the research team backend.
///
/// This is a closed mapping; authors outside it produce no activity line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AgentKind {
    /// Generates search queries from the user question.
    QueryGenerator,
    /// Orchestrates the research loop.
    ResearchManager,
    /// Performs research on one topic.
    Researcher,
    /// Reflects on findings so far.
    Reflector,
    /// Decides whether to iterate or finish.
    LoopController,
    /// Prepares the final summary.
    Summarizer,
}

impl AgentKind {
    /// Maps an event author to a known sub-agent, if any.
    pub fn from_author(author: &str) -> Option<Self> {
        match author {
            "QueryGeneratorAgent" => Some(AgentKind::QueryGenerator),
            "ResearchManager" => Some(AgentKind::ResearchManager),
            "ResearcherAgent" => Some(AgentKind::Researcher),
            "ReflectorAgent" => Some(AgentKind::Reflector),
            "LoopController" => Some(AgentKind::LoopController),
            "SummarizerAgent" => Some(AgentKind::Summarizer),
            _ => None,
        }
    }

    /// Returns the activity phrase shown while this sub-agent works.
    pub fn activity_text(&self) -> &'static str {
        match self {
            AgentKind::QueryGenerator => "Generating search queries...",
            AgentKind::ResearchManager => "Starting research...",
            AgentKind::Researcher => "Researching a topic...",
            AgentKind::Reflector => "Reflecting on findings...",
            AgentKind::LoopController => "Deciding next steps...",
            AgentKind::Summarizer => "Preparing final summary...",
        }
    }
}

/// A chat transcript with its open answer-bubble handle.
///
/// At most one `AgentMessage` bubble is open at a time. The handle is
/// cleared whenever a final-response event arrives, before any text from
/// that event is placed. A final event carrying text therefore always
/// opens a fresh bubble: two consecutive final fragments "A" then "B"
/// yield two bubbles, not one "AB" bubble. That mirrors the event
/// producer's observed contract and is asserted by test; see
/// `second_final_fragment_opens_new_bubble`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<Entry>,
    open_bubble: Option<usize>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript entries in arrival order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the transcript has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all entries and the open-bubble handle.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.open_bubble = None;
    }

    /// Replaces the entries wholesale, e.g. when loading a saved
    /// transcript. The open-bubble handle is reset.
    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.open_bubble = None;
    }

    /// Records a user submission.
    ///
    /// The text is trimmed first; empty or whitespace-only input is a
    /// silent no-op and appends nothing.
    pub fn push_user(&mut self, text: &str) -> Option<RenderOp> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.append(Role::User, text.to_string()))
    }

    /// Records a top-level failure as a single activity-style error line.
    pub fn push_error(&mut self, text: &str) -> RenderOp {
        self.append(Role::AgentActivity, text.to_string())
    }

    /// Routes one inbound event, mutating the transcript and returning
    /// the render instructions it produced.
    ///
    /// Dispatch, in order:
    /// 1. A final-response event clears the open-bubble handle, whether
    ///    or not it carries text.
    /// 2. A non-final event with an author other than `user` renders an
    ///    activity line: string content verbatim, otherwise the
    ///    [`AgentKind`] phrase for a known author. Unknown authors render
    ///    nothing; an event with no author at all is silently skipped.
    /// 3. Independently of step 1, a final-response event whose content
    ///    carries `parts[0].text` appends that text to the open bubble,
    ///    opening one first if none is open.
    pub fn apply(&mut self, event: &AgentEvent) -> Vec<RenderOp> {
        let mut ops = Vec::new();

        if event.is_final_response {
            self.open_bubble = None;
        } else if let Some(author) = event.author.as_deref() {
            if author != "user" {
                if let Some(text) = event.activity_text() {
                    ops.push(self.append(Role::AgentActivity, text.to_string()));
                } else if let Some(kind) = AgentKind::from_author(author) {
                    ops.push(self.append(Role::AgentActivity, kind.activity_text().to_string()));
                }
            }
        }

        if event.is_final_response {
            if let Some(text) = event.final_text() {
                ops.push(self.place_final_fragment(text));
            }
        }

        ops
    }

    /// Places a final-answer fragment: appended to the open bubble when
    /// one exists, otherwise into a freshly opened bubble.
    ///
    /// Under the current event contract every final event clears the
    /// handle first, so [`Transcript::apply`] only ever reaches the open
    /// path; the extend path is the general mechanism, kept and pinned
    /// by `fragment_extends_open_bubble`.
    fn place_final_fragment(&mut self, text: &str) -> RenderOp {
        match self.open_bubble {
            Some(index) => {
                self.entries[index].text.push_str(text);
                RenderOp::ExtendMessage {
                    index,
                    text: text.to_string(),
                }
            }
            None => {
                let op = self.append(Role::AgentMessage, text.to_string());
                self.open_bubble = Some(self.entries.len() - 1);
                op
            }
        }
    }

    fn append(&mut self, role: Role, text: String) -> RenderOp {
        let index = self.entries.len();
        self.entries.push(Entry {
            role,
            text: text.clone(),
        });
        RenderOp::Append { index, role, text }
    }
}
