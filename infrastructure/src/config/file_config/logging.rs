//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving sent messages, replies and failures
    pub conversation_log: Option<String>,
    /// File receiving diagnostic (tracing) output instead of stderr
    pub trace_file: Option<String>,
}
