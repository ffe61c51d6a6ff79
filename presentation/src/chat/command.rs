//! Slash-command parsing for the chat REPL

use chatsync_domain::{SessionId, SessionRegistry};

/// One line of REPL input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line
    Empty,
    /// Anything that is not a command is sent as a message
    Message(String),
    Chats,
    Open(String),
    New,
    Show,
    Help,
    Quit,
    /// A command that needs an argument was given none
    MissingArgument(&'static str),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "chats" | "list" | "ls" => ReplCommand::Chats,
            "open" | "o" if arg.is_empty() => ReplCommand::MissingArgument("open"),
            "open" | "o" => ReplCommand::Open(arg.to_string()),
            "new" | "n" => ReplCommand::New,
            "show" | "history" => ReplCommand::Show,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Resolve an `/open` argument: a 1-based position in the registry, or an id.
///
/// A number outside the listed range is treated as an id, since the service
/// may well use numeric ids.
pub fn resolve_open_target(arg: &str, registry: &SessionRegistry) -> Option<SessionId> {
    if let Ok(n) = arg.parse::<usize>()
        && n >= 1
        && let Some(session) = registry.at(n - 1)
    {
        return Some(session.id.clone());
    }
    SessionId::new(arg).ok()
}

pub const HELP: &str = "\
Commands:
  /chats, /ls        - List chats (* marks the open one)
  /open <n|id>       - Open chat number n from /chats, or by id
  /new               - Start a new chat
  /show              - Reprint the open chat
  /help, /h, /?      - Show this help
  /quit, /exit, /q   - Exit
Anything else is sent as a message.";

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_domain::Session;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            ReplCommand::parse("  hello there "),
            ReplCommand::Message("  hello there ".to_string())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_commands() {
        assert_eq!(ReplCommand::parse("/chats"), ReplCommand::Chats);
        assert_eq!(ReplCommand::parse("/ls"), ReplCommand::Chats);
        assert_eq!(ReplCommand::parse("/new"), ReplCommand::New);
        assert_eq!(ReplCommand::parse("/show"), ReplCommand::Show);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("/open   3 "),
            ReplCommand::Open("3".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/open"),
            ReplCommand::MissingArgument("open")
        );
        assert_eq!(
            ReplCommand::parse("/frobnicate now"),
            ReplCommand::Unknown("/frobnicate now".to_string())
        );
    }

    #[test]
    fn test_resolve_open_target() {
        let registry = SessionRegistry::from_listing(vec![
            Session::new(SessionId::new("c1").unwrap(), "A"),
            Session::new(SessionId::new("c2").unwrap(), "B"),
        ]);

        assert_eq!(
            resolve_open_target("2", &registry).unwrap().as_str(),
            "c2"
        );
        assert_eq!(
            resolve_open_target("c1", &registry).unwrap().as_str(),
            "c1"
        );
        assert_eq!(
            resolve_open_target("17", &registry).unwrap().as_str(),
            "17"
        );
        assert_eq!(
            resolve_open_target("0", &registry).unwrap().as_str(),
            "0"
        );
    }
}
