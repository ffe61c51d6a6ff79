//! Domain layer for chatsync
//!
//! This crate contains the entities, value objects and invariants of the
//! chat client. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Session**: a persisted conversation, identified by a service-assigned id
//! - **Draft**: a conversation the service has not assigned an id to yet
//! - **Registry**: the id-unique list of known sessions, newest first
//! - **Transcript**: the append-only message log of the active session

pub mod core;
pub mod session;
pub mod transcript;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use session::{
    active::ActiveSession,
    entities::{Session, SessionId},
    registry::{PrependOutcome, SessionRegistry},
};
pub use transcript::{
    entities::{Delivery, EntryIndex, Transcript, TranscriptEntry},
    message::{ContentBlock, Message, Role},
};
