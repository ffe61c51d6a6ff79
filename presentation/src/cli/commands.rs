//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chatsync
#[derive(Parser, Debug)]
#[command(name = "chatsync")]
#[command(author, version, about = "Terminal client for a chat session service")]
#[command(long_about = r#"
chatsync talks to a chat service that stores conversations as sessions.
Without arguments it starts an interactive session: type to chat, and use
/chats, /open, /new to move between conversations.

Configuration files are loaded from (in priority order):
1. CHATSYNC_ENDPOINT  Environment override for the service URL
2. --config <path>     Explicit config file
3. ./chatsync.toml     Project-level config
4. ~/.config/chatsync/config.toml   Global config

Example:
  chatsync
  chatsync --endpoint http://localhost:8000 "Plan a weekend in Lisbon"
  chatsync --chat-id 42 "And the restaurants?"
  chatsync --list
"#)]
pub struct Cli {
    /// Send this message once, print the reply and exit
    pub message: Option<String>,

    /// Session to open (REPL) or to send the one-shot message into
    #[arg(long, value_name = "ID")]
    pub chat_id: Option<String>,

    /// List known chats and exit
    #[arg(long, conflicts_with_all = ["message", "history"])]
    pub list: bool,

    /// Print the history of a chat and exit
    #[arg(long, value_name = "ID", conflicts_with = "message")]
    pub history: Option<String>,

    /// Chat service base URL (overrides config and environment)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress notices
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append sent messages and replies to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_shot_message() {
        let cli = Cli::parse_from(["chatsync", "--chat-id", "c1", "-vv", "hello there"]);
        assert_eq!(cli.message.as_deref(), Some("hello there"));
        assert_eq!(cli.chat_id.as_deref(), Some("c1"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.list);
    }

    #[test]
    fn test_list_conflicts_with_message() {
        assert!(Cli::try_parse_from(["chatsync", "--list", "hello"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "chatsync",
            "--endpoint",
            "http://localhost:9000",
            "--timeout-secs",
            "5",
            "--no-config",
        ]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.timeout_secs, Some(5));
        assert!(cli.no_config);
        assert!(cli.message.is_none());
    }
}
