//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session id must not be empty")]
    EmptySessionId,

    #[error("Message has no content")]
    EmptyContent,

    #[error("Transcript entry {0} does not exist")]
    UnknownEntry(usize),

    #[error("Reply must follow entry {expected}, but the transcript ends at entry {last}")]
    ReplyOutOfOrder { expected: usize, last: usize },

    #[error("Entry {0} is not awaiting a reply")]
    NotAwaitingReply(usize),
}
