//! Infrastructure layer for chatsync
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP chat service client, configuration file
//! loading and the JSONL conversation log.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, DEFAULT_ENDPOINT, FileConfig, FileLoggingConfig, FileReplConfig,
    FileServiceConfig, Severity,
};
pub use http::{HttpChatService, HttpError};
pub use logging::JsonlConversationLogger;
