//! Console output formatter for chats and transcripts

use chatsync_application::{ErrorContext, ErrorEvent};
use chatsync_domain::util::preview;
use chatsync_domain::{
    ActiveSession, Delivery, Message, Role, Session, SessionRegistry, TranscriptEntry,
};
use colored::Colorize;

const TITLE_WIDTH: usize = 48;

/// Formats chat state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn colored output off (e.g. `--no-color`); leaves terminal detection alone otherwise.
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// One message with its role badge and, unless confirmed, its delivery state.
    pub fn message(message: &Message, delivery: Delivery) -> String {
        let badge = format!("[{}]", message.role.badge());
        let badge = match message.role {
            Role::User => badge.cyan().bold(),
            Role::Assistant => badge.green().bold(),
        };

        let mut text = message.render_text();
        if text.is_empty() && message.skipped_blocks() > 0 {
            text = format!("({} non-text block(s))", message.skipped_blocks())
                .dimmed()
                .to_string();
        }

        let mut line = format!("{} {}", badge, text);
        match delivery {
            Delivery::Confirmed => {}
            Delivery::Pending => line.push_str(&format!(" {}", "(sending)".dimmed())),
            Delivery::Failed => line.push_str(&format!(" {}", "(not delivered)".red())),
        }
        line
    }

    /// Every entry of a transcript, one message per block.
    pub fn transcript(entries: &[TranscriptEntry]) -> String {
        if entries.is_empty() {
            return "(no messages yet)".dimmed().to_string();
        }
        entries
            .iter()
            .map(|entry| Self::message(&entry.message, entry.delivery))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Numbered session list with the active one marked.
    pub fn registry(registry: &SessionRegistry, active: &ActiveSession) -> String {
        if registry.is_empty() {
            return "No chats yet. Type a message to start one."
                .dimmed()
                .to_string();
        }

        let mut output = format!("{}\n", "Chats:".cyan().bold());
        for (i, session) in registry.sessions().iter().enumerate() {
            let marker = if active.is(&session.id) { "*" } else { " " };
            let title = preview(session.display_title(), TITLE_WIDTH);
            let line = format!("{} {:>3}. {}", marker, i + 1, title);
            if active.is(&session.id) {
                output.push_str(&line.yellow().bold().to_string());
            } else {
                output.push_str(&line);
            }
            if title != session.id.as_str() {
                output.push_str(&format!(" {}", format!("({})", session.id).dimmed()));
            }
            output.push('\n');
        }
        if active.is_draft() {
            output.push_str(&format!("{}\n", "* (new chat)".yellow().bold()));
        }
        output.trim_end().to_string()
    }

    /// Banner printed when the active session changes.
    pub fn active_banner(active: &ActiveSession, registry: &SessionRegistry) -> String {
        let name = match active.session_id() {
            None => "new chat".to_string(),
            Some(id) => registry
                .get(id)
                .map(Session::display_title)
                .map(|title| preview(title, TITLE_WIDTH))
                .unwrap_or_else(|| id.to_string()),
        };
        format!("── {} ──", name).yellow().bold().to_string()
    }

    /// Error report as shown to the user.
    pub fn error(event: &ErrorEvent) -> String {
        let text = match event.context {
            ErrorContext::LoadRegistry => format!(
                "Error fetching chats, please try again later. {}",
                event.message
            ),
            ErrorContext::LoadHistory | ErrorContext::Send => format!("Error: {}", event.message),
        };
        text.red().to_string()
    }

    pub fn notice(text: &str) -> String {
        text.dimmed().to_string()
    }
}
