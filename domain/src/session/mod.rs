//! Chat session domain.
//!
//! - [`entities::Session`] — a persisted chat session (id + title)
//! - [`active::ActiveSession`] — the session the transcript belongs to, or a draft
//! - [`registry::SessionRegistry`] — ordered, id-unique list of known sessions

pub mod active;
pub mod entities;
pub mod registry;
