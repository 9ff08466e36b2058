use std::borrow::Cow::{self, Borrowed, Owned};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use tokio::time::timeout;

use parley_client::{ChatController, LoopbackClient};
use parley_core::entry::SenderRole;
use parley_core::projection::{RowKey, RowKind, TranscriptRow};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/reset".to_string(),
                "/hours".to_string(),
                "/end".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_row(row: &TranscriptRow) {
    match &row.kind {
        RowKind::Bubble {
            body,
            sender,
            timestamp_label,
        } => {
            let tag = format!("[{}]", sender);
            let tag = match sender {
                SenderRole::User => tag.green(),
                SenderRole::Agent => tag.bright_blue(),
                SenderRole::Chatbot => tag.bright_magenta(),
                SenderRole::System => tag.bright_black(),
            };
            println!("{} {} {}", tag, body, timestamp_label.bright_black());
        }
        RowKind::Placeholder => {
            println!("{}", "[unsupported message]".bright_black());
        }
        RowKind::TypingIndicator => {}
    }
}

/// The main entry point for the Parley chat REPL.
///
/// This async function sets up a rustyline-based REPL that:
/// 1. Wires a loopback messaging backend to a `ChatController`
/// 2. Renders newly projected transcript rows as snapshots change
/// 3. Provides command completion for /reset, /hours, and /end
/// 4. Sends chat messages asynchronously without blocking input
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Backend Initialization =====
    let (client, events) = LoopbackClient::new();
    let handle = ChatController::spawn(client, events);

    // Spawn render task: prints transcript rows as snapshots arrive
    let mut snapshots = handle.subscribe();
    let renderer = tokio::spawn(async move {
        let mut rendered = 0usize;
        let mut typing_shown = false;

        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow().clone();
            let rows: Vec<TranscriptRow> = snapshot.rows().collect();

            let entry_rows: Vec<&TranscriptRow> = rows
                .iter()
                .filter(|row| matches!(row.key, RowKey::Entry(_)))
                .collect();

            // A shrinking feed means the session was reset.
            if entry_rows.len() < rendered {
                rendered = 0;
                println!("{}", "--- conversation reset ---".bright_yellow());
            }
            for row in &entry_rows[rendered..] {
                print_row(row);
            }
            rendered = entry_rows.len();

            let typing = rows
                .last()
                .is_some_and(|row| row.key == RowKey::TypingIndicator);
            if typing && !typing_shown {
                println!("{}", "agent is typing...".bright_black().italic());
            }
            typing_shown = typing;
        }
    });

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Parley Chat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/reset' for a new conversation, '/hours' for business hours, or 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/reset" => {
                        let conversation_id = handle.reset_session().await?;
                        println!(
                            "{}",
                            format!("New conversation: {}", conversation_id).bright_yellow()
                        );
                    }
                    "/hours" => match handle.check_business_hours().await {
                        Ok(true) => println!("{}", "Within business hours.".bright_green()),
                        Ok(false) => println!("{}", "Outside business hours.".yellow()),
                        Err(e) => eprintln!("{}", format!("Business hours lookup failed: {e}").red()),
                    },
                    "/end" => {
                        if let Err(e) = handle.end_session().await {
                            eprintln!("{}", format!("Failed to end conversation: {e}").red());
                        }
                    }
                    _ => {
                        // Send in the background so slow transports never
                        // block the prompt.
                        let sender = handle.clone();
                        let text = trimmed.to_string();
                        tokio::spawn(async move {
                            match timeout(Duration::from_secs(30), sender.send_text(text)).await {
                                Ok(Ok(())) => {}
                                Ok(Err(e)) => {
                                    eprintln!("{}", format!("Send failed: {e}").red());
                                }
                                Err(_) => {
                                    eprintln!("{}", "Send timed out.".red());
                                }
                            }
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    renderer.abort();
    Ok(())
}
