//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording what was sent and
//! received (messages, replies, failed sends, created sessions) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! diagnostics, while this port keeps a machine-readable record of the
//! conversation itself (JSONL).

use serde_json::Value;

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message_sent", "reply_received").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible so it never disturbs the chat flow;
/// implementations swallow their own write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
