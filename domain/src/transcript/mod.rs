//! Transcript domain.
//!
//! - [`message::Message`] — one user or assistant turn made of content blocks
//! - [`entities::Transcript`] — the append-only log of one session

pub mod entities;
pub mod message;
