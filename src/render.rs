//! Output rendering for chat streaming.
//!
//! This module provides a renderer trait and a plain-text implementation.
//! Routing produces [`RenderOp`] values; renderers turn them into output.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::transcript::{RenderOp, Role};

/// ANSI escape code for dim text (used for activity lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for activity lines).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering streaming chat output.
///
/// This abstraction allows for different rendering strategies: plain text
/// with ANSI styling, plain text without styling for piping, or a
/// recording renderer in tests.
pub trait Renderer: Send {
    /// Render one routing instruction.
    fn render(&mut self, op: &RenderOp);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when an exchange is complete.
    ///
    /// Used to ensure proper newlines and cleanup after streaming.
    fn finish_exchange(&mut self) {}

    /// Called when the stream is interrupted by the user.
    fn print_interrupted(&mut self) {}

    /// Returns true if streaming should be interrupted.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Plain text renderer with optional ANSI styling.
///
/// Activity lines are shown dim and italic to distinguish them from
/// answer text. User entries are not re-echoed; the prompt already shows
/// them.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    in_message: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            in_message: false,
            interrupted: None,
        }
    }

    /// Attaches an interrupt flag to the renderer.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn end_open_message(&mut self) {
        if self.in_message {
            println!();
            self.in_message = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn render(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Append { role, text, .. } => match role {
                Role::User => {}
                Role::AgentActivity => {
                    self.end_open_message();
                    if self.use_color {
                        println!("{ANSI_DIM}{ANSI_ITALIC}{text}{ANSI_RESET}");
                    } else {
                        println!("[{text}]");
                    }
                    self.flush();
                }
                Role::AgentMessage => {
                    self.end_open_message();
                    print!("{text}");
                    self.in_message = true;
                    self.flush();
                }
            },
            RenderOp::ExtendMessage { text, .. } => {
                print!("{text}");
                self.in_message = true;
                self.flush();
            }
        }
    }

    fn print_error(&mut self, error: &str) {
        self.end_open_message();
        if self.use_color {
            eprintln!("{ANSI_RED}{error}{ANSI_RESET}");
        } else {
            eprintln!("{error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.end_open_message();
        println!("{info}");
        self.flush();
    }

    fn finish_exchange(&mut self) {
        self.end_open_message();
        self.flush();
    }

    fn print_interrupted(&mut self) {
        self.end_open_message();
        println!("[interrupted]");
        self.flush();
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
