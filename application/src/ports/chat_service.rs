//! Chat service port
//!
//! Defines the interface for talking to the remote chat service that owns
//! sessions, history and reply generation.

use async_trait::async_trait;
use chatsync_domain::{Message, Session, SessionId};
use thiserror::Error;

/// Origin of a [`RemoteError`].
///
/// Kept for diagnostics only; callers treat both kinds the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Network failure, timeout or non-2xx status.
    Fetch,
    /// The body was not the JSON the contract promises.
    Parse,
}

/// The single error surfaced by every remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Fetch,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Parse,
            message: message.into(),
        }
    }
}

/// Response to a submitted message.
#[derive(Debug, Clone, PartialEq)]
pub struct SendReply {
    /// The session the message landed in. Always present when the message
    /// started a new session; an optional echo otherwise.
    pub chat: Option<Session>,
    /// The assistant's reply.
    pub message: Message,
}

/// Remote chat service
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatServicePort: Send + Sync {
    /// List every known session.
    async fn list_sessions(&self) -> Result<Vec<Session>, RemoteError>;

    /// Full message history of one session.
    async fn load_history(&self, session: &SessionId) -> Result<Vec<Message>, RemoteError>;

    /// Submit a user message. `session` is `None` for the first message of
    /// a new session, which the service then creates.
    async fn send_message(
        &self,
        text: &str,
        session: Option<&SessionId>,
    ) -> Result<SendReply, RemoteError>;
}
