//! Presentation-level configuration
//!
//! Settings for the interactive REPL, resolved from the file config and
//! command-line flags by the binary.

use std::path::{Path, PathBuf};

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Print notices while history loads or a reply is pending
    pub show_progress: bool,
    /// Path to history file (`None` = default location)
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, or `$XDG_DATA_HOME/chatsync/history.txt`.
    ///
    /// A leading `~` in the configured path is expanded to the home directory.
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|p| p.join("chatsync").join("history.txt")),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
