mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::conversation::{ConversationEngine, Event, Keyboard, MenuAction, Reply, CANCEL_LABEL};
use crate::db::Database;
use crate::models::UserId;

pub(crate) use cli::as_cli;

/// Chat over stdin and stdout as `user`.
///
/// Every line is a text message, except lines starting with `#`, which pick
/// one of the offered choices by id (`#del_3`).
pub(crate) fn as_chat(db: Database, config: &Config, user: UserId) -> Result<()> {
    let engine = ConversationEngine::new(db, config.session_timeout);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    send(&engine, Event::text(user, "/start"), &mut out)?;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let Some(event) = to_event(user, &line) else {
            continue;
        };
        send(&engine, event, &mut out)?;
    }
    tracing::debug!("stdin closed, {} sessions open", engine.active_sessions());
    Ok(())
}

fn to_event(user: UserId, line: &str) -> Option<Event> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.strip_prefix('#') {
        Some(choice_id) => Event::selection(user, choice_id.trim()),
        None => Event::text(user, line),
    })
}

fn send(
    engine: &ConversationEngine<Database>,
    event: Event,
    out: &mut impl Write,
) -> Result<()> {
    match engine.handle(event) {
        Ok(replies) => {
            for reply in &replies {
                write!(out, "{}", render_reply(reply))?;
            }
        }
        Err(e) => {
            tracing::error!("turn failed: {e}");
            writeln!(out, "⚠️ Something went wrong. Please try again.\n")?;
        }
    }
    out.flush()?;
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────

fn render_reply(reply: &Reply) -> String {
    let mut text = format!("{}\n", reply.text);
    match &reply.keyboard {
        Keyboard::None => {}
        Keyboard::Menu => {
            for row in MenuAction::rows() {
                let buttons: Vec<String> = row.iter().map(|a| format!("[{}]", a.label())).collect();
                text.push_str(&format!("  {}\n", buttons.join(" ")));
            }
        }
        Keyboard::Cancel => text.push_str(&format!("  [{CANCEL_LABEL}]\n")),
        Keyboard::Choices(choices) => {
            for choice in choices {
                text.push_str(&format!("  #{}  {}\n", choice.id, choice.label));
            }
        }
    }
    text.push('\n');
    text
}
