//! Chat service configuration from TOML (`[service]` section)

use serde::{Deserialize, Serialize};

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Raw chat service configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Base URL of the chat service REST API
    pub endpoint: String,
    /// Per-request timeout in seconds (unset = wait indefinitely)
    pub timeout_secs: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}
