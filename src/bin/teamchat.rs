//! Interactive chat application for conversing with a research-agent
//! backend.
//!
//! This binary provides a streaming REPL interface against a backend
//! exposing `POST /run_sse`.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage against a local backend
//! teamchat
//!
//! # Point at a remote backend
//! teamchat --base-url https://agents.example.com/
//!
//! # Use a different session id
//! teamchat --session session_xyz
//!
//! # Disable colors (useful for piping output)
//! teamchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear the transcript
//! - `/session <id>` - Switch session id
//! - `/config` - Show current configuration
//! - `/quit` - Exit the application

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use teamchat::AgentClient;
use teamchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, SessionStats,
    help_text, parse_command,
};

/// Main entry point for the teamchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("teamchat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = AgentClient::with_options(config.base_url.clone(), config.timeout)?;
    let mut session = ChatSession::new(client, config);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    let mut renderer =
        PlainTextRenderer::with_color(use_color).with_interrupt(interrupted.clone());

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Research Team Chat (session: {})", session.session_id());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Transcript cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {line}");
                            }
                        }
                        ChatCommand::Session(id) => {
                            session.set_session_id(id.clone());
                            renderer.print_info(&format!("Session changed to: {id}"));
                        }
                        ChatCommand::User(id) => {
                            session.set_user_id(id.clone());
                            renderer.print_info(&format!("User changed to: {id}"));
                        }
                        ChatCommand::TranscriptPath(path) => {
                            session.set_transcript_path(Some(PathBuf::from(&path)));
                            renderer.print_info(&format!("Transcript auto-save set to {path}"));
                        }
                        ChatCommand::ClearTranscriptPath => {
                            session.set_transcript_path(None);
                            renderer.print_info("Transcript auto-save disabled.");
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {path}"))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {err}")),
                            }
                        }
                        ChatCommand::LoadTranscript(path) => {
                            match session.load_transcript_from(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript loaded from {path}"))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to load transcript: {err}")),
                            }
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session.stats());
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular query - send to the backend
                if let Err(e) = session.send_streaming(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    Ok(())
}

fn print_config(stats: &SessionStats) {
    println!("    Current Configuration:");
    println!("      Backend: {}", stats.base_url);
    println!("      App: {}", stats.app_name);
    println!("      User: {}", stats.user_id);
    println!("      Session: {}", stats.session_id);
    println!("      Transcript entries: {}", stats.entry_count);
    println!("      Completed exchanges: {}", stats.exchange_count);
    println!("      Skipped records: {}", stats.skipped_records);
    match stats.transcript_path {
        Some(ref path) => println!("      Transcript file: {}", path.display()),
        None => println!("      Transcript file: (disabled)"),
    }
}
