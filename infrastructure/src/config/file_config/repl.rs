//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Print a notice while a reply is pending
    pub show_progress: bool,
    /// Enable colored terminal output
    pub color: bool,
    /// Path to the line-editor history file (a leading `~` means home)
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            color: true,
            history_file: None,
        }
    }
}
