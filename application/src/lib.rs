//! Application layer for chatsync
//!
//! This crate contains the session synchronization use cases and the port
//! definitions they depend on. It depends only on the domain layer.
//!
//! The [`ChatController`] reconciles three views that evolve independently:
//! the session registry, the active transcript and in-flight sends. Remote
//! calls are issued as tagged [`RemoteRequest`]s; their [`Completion`]s are
//! applied only while the view they were issued for is still active.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_service::{ChatServicePort, RemoteError, RemoteErrorKind, SendReply},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    ui_event::{ErrorContext, ErrorEvent, StaleKind, UiEvent},
};
pub use use_cases::chat_controller::{ChatController, Completion, RemoteRequest};
pub use use_cases::registry_store::{LoadStatus, SessionRegistryStore};
pub use use_cases::send_coordinator::{
    NO_ROLLBACK_ON_SEND_FAILURE, SendCoordinator, SendOutcome, SendPhase, SendRejected,
    SendTicket,
};
pub use use_cases::session_switcher::{HistoryTicket, SessionSwitcher, ViewTag};
pub use use_cases::transcript_store::TranscriptStore;
