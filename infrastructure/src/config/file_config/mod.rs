//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

mod logging;
mod repl;
mod service;

pub use logging::FileLoggingConfig;
pub use repl::FileReplConfig;
pub use service::{DEFAULT_ENDPOINT, FileServiceConfig};

use super::validation::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat service connection
    pub service: FileServiceConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation and diagnostic logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let endpoint = self.service.endpoint.trim();
        if endpoint.is_empty() {
            issues.push(ConfigIssue::error(
                "service.endpoint",
                "endpoint must not be empty",
            ));
        } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                "service.endpoint",
                format!("'{}' is not an http(s) URL", endpoint),
            ));
        }

        if self.service.timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                "service.timeout_secs",
                "a zero timeout is ignored; requests wait indefinitely",
            ));
        }

        if matches!(&self.logging.conversation_log, Some(p) if p.trim().is_empty()) {
            issues.push(ConfigIssue::warning(
                "logging.conversation_log",
                "empty path; conversation logging disabled",
            ));
        }

        issues
    }
}
