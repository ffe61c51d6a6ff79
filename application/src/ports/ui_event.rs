//! UI event types emitted by the ChatController for presentation rendering
//!
//! These events form the output port from the application layer to the
//! presentation layer. Every remote failure reaches the user through
//! [`UiEvent::Error`]; how it is shown is up to the presenter.

use chatsync_domain::{ActiveSession, Delivery, EntryIndex, Message, Session, TranscriptEntry};

/// Events emitted by ChatController for the presentation layer to render
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // === Registry ===
    /// The initial session listing arrived
    RegistryLoaded { sessions: Vec<Session> },
    /// A session was created, moved or retitled
    RegistryChanged {
        sessions: Vec<Session>,
        active: ActiveSession,
    },

    // === Active session ===
    /// The active-session pointer moved
    ActiveChanged { active: ActiveSession },
    /// History for the newly active session is being fetched
    HistoryLoading { active: ActiveSession },

    // === Transcript ===
    /// The transcript was replaced wholesale (history load or draft reset)
    TranscriptReplaced { entries: Vec<TranscriptEntry> },
    /// A single message was appended
    MessageAppended {
        index: EntryIndex,
        message: Message,
        delivery: Delivery,
    },
    /// An existing entry changed delivery state
    DeliveryChanged {
        index: EntryIndex,
        delivery: Delivery,
    },

    // === Concurrency ===
    /// A response arrived for a view that is no longer active and was not shown
    StaleDropped { kind: StaleKind, issued_for: ActiveSession },

    // === Errors ===
    /// Human-readable error report
    Error(ErrorEvent),
}

/// Which kind of late response was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleKind {
    History,
    Reply,
}

/// Which operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    LoadRegistry,
    LoadHistory,
    Send,
}

/// Error report for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub context: ErrorContext,
    pub message: String,
}

impl ErrorEvent {
    pub fn new(context: ErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }
}
