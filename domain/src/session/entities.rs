//! Session domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat session (Value Object)
///
/// Ids are opaque and always assigned by the remote chat service; the client
/// never invents one. A session that has not been persisted yet has no id at
/// all and is represented by [`ActiveSession::Draft`](super::active::ActiveSession::Draft).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::EmptySessionId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted chat session as listed in the sidebar (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
}

impl Session {
    pub fn new(id: SessionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Session known only by its id; the id doubles as the title.
    pub fn untitled(id: SessionId) -> Self {
        let title = id.as_str().to_string();
        Self { id, title }
    }

    /// Title to show, falling back to the id when the service sent none.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_session_id_is_rejected() {
        assert_eq!(SessionId::new("  "), Err(DomainError::EmptySessionId));
        assert!(SessionId::new("c1").is_ok());
    }

    #[test]
    fn session_id_deserializes_from_plain_string() {
        let id: SessionId = serde_json::from_str("\"c42\"").unwrap();
        assert_eq!(id.as_str(), "c42");
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
    }

    #[test]
    fn untitled_session_uses_id_as_title() {
        let session = Session::untitled(SessionId::new("abc").unwrap());
        assert_eq!(session.title, "abc");
        assert_eq!(session.display_title(), "abc");
    }

    #[test]
    fn empty_title_displays_id() {
        let session = Session::new(SessionId::new("abc").unwrap(), "");
        assert_eq!(session.display_title(), "abc");
    }
}
