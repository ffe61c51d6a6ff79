//! JSON shapes returned by the chat service.
//!
//! The service is loose about identity fields: a session may arrive as a
//! bare id or as `{id, title}`, ids may be strings or numbers, and older
//! servers answer a send with `chat_id` instead of a `chat` object. These
//! DTOs absorb that variation before anything reaches the domain.

use chatsync_application::SendReply;
use chatsync_domain::{DomainError, Message, Session, SessionId};
use serde::Deserialize;
use tracing::warn;

/// A session identifier as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    pub fn into_session_id(self) -> Result<SessionId, DomainError> {
        match self {
            WireId::Text(id) => SessionId::new(id),
            WireId::Number(n) => SessionId::new(n.to_string()),
        }
    }
}

/// One entry of `GET /chats`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionRecord {
    Full {
        id: WireId,
        #[serde(default)]
        title: Option<String>,
    },
    Bare(WireId),
}

impl SessionRecord {
    /// Missing or blank titles fall back to the id.
    pub fn into_session(self) -> Result<Session, DomainError> {
        match self {
            SessionRecord::Full { id, title } => {
                let id = id.into_session_id()?;
                Ok(match title {
                    Some(title) if !title.trim().is_empty() => Session::new(id, title),
                    _ => Session::untitled(id),
                })
            }
            SessionRecord::Bare(id) => Ok(Session::untitled(id.into_session_id()?)),
        }
    }
}

/// Body of a `POST /chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendReplyDto {
    #[serde(default)]
    pub chat: Option<SessionRecord>,
    #[serde(default)]
    pub chat_id: Option<WireId>,
    pub message: Message,
}

impl SendReplyDto {
    /// `chat` wins over the legacy `chat_id` when both are present.
    ///
    /// A follow-up (`followup = true`) already knows its session, so a
    /// malformed identity echo is dropped with a warning instead of failing
    /// the send. A first send needs the echo to learn its id.
    pub fn into_reply(self, followup: bool) -> Result<SendReply, DomainError> {
        let chat = match self.identity() {
            Ok(chat) => chat,
            Err(err) if followup => {
                warn!(error = %err, "Ignoring malformed chat identity on follow-up reply");
                None
            }
            Err(err) => return Err(err),
        };
        Ok(SendReply {
            chat,
            message: self.message,
        })
    }

    fn identity(&self) -> Result<Option<Session>, DomainError> {
        Ok(match (&self.chat, &self.chat_id) {
            (Some(record), _) => Some(record.clone().into_session()?),
            (None, Some(id)) => Some(Session::untitled(id.clone().into_session_id()?)),
            (None, None) => None,
        })
    }
}
