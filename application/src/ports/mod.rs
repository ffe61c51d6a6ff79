//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_service;
pub mod conversation_logger;
pub mod ui_event;
