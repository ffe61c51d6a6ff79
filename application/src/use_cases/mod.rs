//! Use cases
//!
//! The four cooperating parts of session synchronization and the controller
//! that owns them.

pub mod chat_controller;
pub mod registry_store;
pub mod send_coordinator;
pub mod session_switcher;
pub mod transcript_store;
