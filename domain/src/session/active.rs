//! The active-session pointer.

use super::entities::SessionId;
use std::fmt;

/// Which session the transcript currently belongs to.
///
/// Exactly one value is active at any time. `Draft` is a new conversation
/// that the service has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveSession {
    #[default]
    Draft,
    Persisted(SessionId),
}

impl ActiveSession {
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            ActiveSession::Draft => None,
            ActiveSession::Persisted(id) => Some(id),
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, ActiveSession::Draft)
    }

    pub fn is(&self, id: &SessionId) -> bool {
        self.session_id() == Some(id)
    }
}

impl From<Option<SessionId>> for ActiveSession {
    fn from(id: Option<SessionId>) -> Self {
        match id {
            Some(id) => ActiveSession::Persisted(id),
            None => ActiveSession::Draft,
        }
    }
}

impl fmt::Display for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveSession::Draft => f.write_str("(new chat)"),
            ActiveSession::Persisted(id) => write!(f, "{}", id),
        }
    }
}
