//! Terminal front-end for the chat surface.
//!
//! Draws turns as plain text: user turns right-aligned, bot turns left-aligned
//! with their badges and a collapsible evidence block. The REPL reads stdin
//! concurrently with the pending reply so that lines typed while the
//! assistant is busy are rejected instead of queued.

use std::collections::HashSet;
use std::io::{self, IsTerminal, Write};

use registrar_chat::presentation::EXACT_MATCH_LABEL;
use registrar_chat::{ChatError, ChatSurface, ChatTurn, Notification, PendingReply, Role, TurnContent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

/// Column width user turns are right-aligned to.
const WIDTH: usize = 78;

const TYPING_INDICATOR: &str = "bot › Typing...";

// =============================================================================
// Rendering
// =============================================================================

/// Render one turn. `expanded` opens the evidence block if there is one.
pub fn render_turn(turn: &ChatTurn, expanded: bool) -> String {
    match (&turn.role, &turn.content) {
        (Role::User, TurnContent::Text(text)) => render_user(text),
        (_, TurnContent::Response(r)) => {
            let mut out = String::from("bot ›\n");
            for line in r.answer.lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }

            let mut badges = Vec::new();
            if r.exact_match {
                badges.push(format!("[{}]", EXACT_MATCH_LABEL));
            }
            if let Some(ref badge) = r.confidence {
                badges.push(format!("[{} ({})]", badge.label(), badge.tier));
            }
            if !badges.is_empty() {
                out.push_str("  ");
                out.push_str(&badges.join(" "));
                out.push('\n');
            }

            if let Some(ref panel) = r.evidence {
                if panel.collapsed && !expanded {
                    out.push_str(&format!("  ▸ {} (:evidence to expand)\n", panel.title));
                } else {
                    out.push_str(&format!("  ▾ {}\n", panel.title));
                    for line in panel.body.lines() {
                        out.push_str("    │ ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
            out
        }
        (Role::Bot, TurnContent::Text(text)) => format!("bot › {}\n", text),
    }
}

fn render_user(text: &str) -> String {
    let mut out = String::new();
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        let line = if lines.peek().is_none() {
            format!("{} ‹ you", line)
        } else {
            line.to_string()
        };
        let pad = WIDTH.saturating_sub(line.chars().count());
        out.push_str(&" ".repeat(pad));
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    format!("! {}: {}\n", notification.title, notification.description)
}

// =============================================================================
// Transcript
// =============================================================================

/// Tracks what has already been printed so each flush appends only the
/// newest turns, keeping the view scrolled to the bottom.
#[derive(Default)]
pub struct Transcript {
    printed: HashSet<String>,
    expanded: HashSet<String>,
    typing_shown: bool,
}

impl Transcript {
    /// Print turns not yet shown, and the typing indicator once per wait.
    pub fn flush(&mut self, surface: &ChatSurface, out: &mut impl Write) -> Result<(), ChatError> {
        let view = surface.view()?;
        for turn in &view.turns {
            if self.printed.insert(turn.id.clone()) {
                write_str(out, &render_turn(turn, self.expanded.contains(&turn.id)));
            }
        }
        // Forget ids that were evicted from a bounded log.
        let live: HashSet<&str> = view.turns.iter().map(|t| t.id.as_str()).collect();
        self.printed.retain(|id| live.contains(id.as_str()));

        if view.loading && !self.typing_shown {
            write_str(out, &format!("{}\n", TYPING_INDICATOR));
        }
        self.typing_shown = view.loading;
        let _ = out.flush();
        Ok(())
    }

    /// Expand the newest bot turn carrying evidence and print it again.
    pub fn expand_latest(&mut self, surface: &ChatSurface, out: &mut impl Write) -> Result<(), ChatError> {
        let view = surface.view()?;
        let latest = view
            .turns
            .iter()
            .rev()
            .find(|t| t.response().is_some_and(|r| r.evidence.is_some()));
        match latest {
            Some(turn) => {
                self.expanded.insert(turn.id.clone());
                write_str(out, &render_turn(turn, true));
            }
            None => write_str(out, "  (no evidence to show)\n"),
        }
        let _ = out.flush();
        Ok(())
    }

    /// Print the whole log again.
    pub fn replay(&mut self, surface: &ChatSurface, out: &mut impl Write) -> Result<(), ChatError> {
        self.printed.clear();
        self.typing_shown = false;
        self.flush(surface, out)
    }
}

fn write_str(out: &mut impl Write, s: &str) {
    if let Err(e) = out.write_all(s.as_bytes()) {
        tracing::warn!(error = %e, "Failed to write to terminal");
    }
}

// =============================================================================
// REPL
// =============================================================================

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Evidence,
    History,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":evidence" => Command::Evidence,
            ":history" => Command::History,
            ":quit" | ":q" | ":exit" => Command::Quit,
            _ => Command::Ask(line.to_string()),
        }
    }
}

/// Ask one question and print the reply with its evidence expanded.
pub async fn run_once(surface: &ChatSurface, query: &str) -> Result<(), ChatError> {
    let turn = surface.submit(query)?.settled().await?;
    let mut out = io::stdout().lock();
    write_str(&mut out, &render_turn(&turn, true));
    let _ = out.flush();
    Ok(())
}

/// Interactive loop over stdin.
///
/// When stdin is not a terminal each reply is awaited before the next line
/// is read, so piped scripts get one answer per line.
pub async fn run_repl(surface: ChatSurface) -> Result<(), ChatError> {
    let interactive = io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut changes = surface.subscribe_changes();
    let mut alerts = surface.subscribe_notifications();
    let mut transcript = Transcript::default();
    let mut pending: Option<PendingReply> = None;

    transcript.flush(&surface, &mut io::stdout())?;

    loop {
        if !interactive {
            if let Some(reply) = pending.take() {
                reply.settled().await?;
                transcript.flush(&surface, &mut io::stdout())?;
            }
        }

        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read stdin");
                        break;
                    }
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Evidence => transcript.expand_latest(&surface, &mut io::stdout())?,
                    Command::History => transcript.replay(&surface, &mut io::stdout())?,
                    Command::Ask(text) => match surface.submit(&text) {
                        Ok(reply) => pending = Some(reply),
                        Err(ChatError::EmptyMessage) => {}
                        Err(ChatError::Busy) => {
                            println!("  (input disabled while the assistant is typing)");
                        }
                        Err(e) => return Err(e),
                    },
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                transcript.flush(&surface, &mut io::stdout())?;
            }
            alert = alerts.recv() => match alert {
                Ok(n) => eprint!("{}", render_notification(&n)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropped notifications");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Let an outstanding reply land before exiting on EOF.
    if let Some(reply) = pending.take() {
        if !reply.is_finished() {
            tracing::debug!("Waiting for the outstanding reply before exit");
        }
        reply.settled().await?;
        transcript.flush(&surface, &mut io::stdout())?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_chat::{BotResponse, ResponseKind};

    #[test]
    fn test_render_user_right_aligned() {
        let turn = ChatTurn::user("1", "hello");
        let s = render_turn(&turn, false);
        assert!(s.ends_with("hello ‹ you\n"));
        assert_eq!(s.trim_end_matches('\n').chars().count(), WIDTH);
    }

    #[test]
    fn test_render_bot_collapsed_evidence() {
        let resp = BotResponse::new(ResponseKind::Exact, "Alice Johnson's attendance rate is 95%.")
            .with_confidence(0.95)
            .with_evidence("{\n  \"studentId\": \"S001\"\n}");
        let s = render_turn(&ChatTurn::bot("2", &resp), false);
        assert!(s.starts_with("bot ›\n  Alice Johnson's attendance rate is 95%.\n"));
        assert!(s.contains("[Exact Match] [Confidence: 95% (high)]"));
        assert!(s.contains("▸ Show Verified Evidence"));
        assert!(!s.contains("studentId"));
    }

    #[test]
    fn test_render_bot_expanded_evidence() {
        let resp = BotResponse::new(ResponseKind::Partial, "a\nb")
            .with_confidence(0.88)
            .with_evidence("{\n  \"id\": \"S004\"\n}");
        let s = render_turn(&ChatTurn::bot("3", &resp), true);
        assert!(s.contains("  a\n  b\n"));
        assert!(!s.contains("Exact Match"));
        assert!(s.contains("▾ Show Verified Evidence"));
        assert!(s.contains("    │   \"id\": \"S004\"\n"));
    }

    #[test]
    fn test_render_bot_without_badges() {
        let s = render_turn(&ChatTurn::bot("4", &BotResponse::new(ResponseKind::None, "hi")), false);
        assert_eq!(s, "bot ›\n  hi\n");
    }

    #[test]
    fn test_render_notification() {
        let s = render_notification(&Notification::error_reply("boom"));
        assert_eq!(s, "! Error: boom\n");
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse(" :quit "), Command::Quit);
        assert_eq!(Command::parse(":evidence"), Command::Evidence);
        assert_eq!(Command::parse(":history"), Command::History);
        assert_eq!(
            Command::parse("list students"),
            Command::Ask("list students".to_string())
        );
    }

    #[tokio::test]
    async fn test_transcript_prints_each_turn_once() {
        let mut config = registrar_core::RegistrarConfig::default();
        config.resolver.min_latency_ms = 0;
        config.resolver.max_latency_ms = 0;
        let surface = ChatSurface::from_config(&config).unwrap();
        let mut transcript = Transcript::default();

        let mut buf = Vec::new();
        transcript.flush(&surface, &mut buf).unwrap();
        let first = String::from_utf8(buf).unwrap();
        assert!(first.contains("administrative assistant bot"));

        surface.submit("bob marks").unwrap().settled().await.unwrap();
        let mut buf = Vec::new();
        transcript.flush(&surface, &mut buf).unwrap();
        let second = String::from_utf8(buf).unwrap();
        assert!(!second.contains("administrative assistant bot"));
        assert!(second.contains("bob marks ‹ you"));
        assert!(second.contains("Bob Smith has achieved a grade of B+ with 85 marks."));
    }

    #[tokio::test]
    async fn test_expand_latest_prints_evidence() {
        let mut config = registrar_core::RegistrarConfig::default();
        config.resolver.min_latency_ms = 0;
        config.resolver.max_latency_ms = 0;
        let surface = ChatSurface::from_config(&config).unwrap();
        let mut transcript = Transcript::default();

        let mut buf = Vec::new();
        transcript.expand_latest(&surface, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("no evidence"));

        surface.submit("carol").unwrap().settled().await.unwrap();
        let mut buf = Vec::new();
        transcript.expand_latest(&surface, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\"id\": \"S003\""));
    }
}
