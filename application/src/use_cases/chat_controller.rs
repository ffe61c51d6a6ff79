//! Chat Controller
//!
//! Single owner of the client state: the session registry, the transcript,
//! the active-session pointer and the send coordinator. Presentation code
//! only calls the commands below and renders the [`UiEvent`]s it emits.
//!
//! Every command is split into a synchronous part that runs on the
//! controller and a [`RemoteRequest`] that the caller executes wherever it
//! likes (inline, or on a task set). The resulting [`Completion`] is fed back
//! through [`ChatController::finalize`], which applies it only if the view it
//! was issued for is still current.

use crate::ports::chat_service::{ChatServicePort, RemoteError, SendReply};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::ui_event::UiEvent;
use crate::use_cases::registry_store::{LoadStatus, SessionRegistryStore};
use crate::use_cases::send_coordinator::{
    SendCoordinator, SendOutcome, SendPhase, SendRejected, SendTicket,
};
use crate::use_cases::session_switcher::{HistoryTicket, SessionSwitcher};
use crate::use_cases::transcript_store::TranscriptStore;
use chatsync_domain::{ActiveSession, Message, Session, SessionId, SessionRegistry, Transcript};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Remote work produced by a command, to be executed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    ListSessions,
    History(HistoryTicket),
    Send(SendTicket),
}

impl RemoteRequest {
    /// Perform the remote call. Never touches controller state.
    pub async fn execute(self, service: Arc<dyn ChatServicePort>) -> Completion {
        match self {
            RemoteRequest::ListSessions => {
                Completion::Sessions(SessionRegistryStore::load(service.as_ref()).await)
            }
            RemoteRequest::History(ticket) => {
                let result = TranscriptStore::load_history(service.as_ref(), &ticket.session).await;
                Completion::History(ticket, result)
            }
            RemoteRequest::Send(ticket) => {
                let result = service.send_message(&ticket.text, ticket.session()).await;
                Completion::Send(ticket, result)
            }
        }
    }
}

/// A resolved [`RemoteRequest`], tagged with what it was issued for.
#[derive(Debug, Clone)]
pub enum Completion {
    Sessions(Result<Vec<Session>, RemoteError>),
    History(HistoryTicket, Result<Vec<Message>, RemoteError>),
    Send(SendTicket, Result<SendReply, RemoteError>),
}

pub struct ChatController {
    service: Arc<dyn ChatServicePort>,
    registry: SessionRegistryStore,
    transcript: TranscriptStore,
    switcher: SessionSwitcher,
    coordinator: SendCoordinator,
    /// Channel sender for UI events
    tx: mpsc::UnboundedSender<UiEvent>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatController {
    /// Create a controller with an empty registry and a draft as active session.
    pub fn new(service: Arc<dyn ChatServicePort>, tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            service,
            registry: SessionRegistryStore::new(),
            transcript: TranscriptStore::new(),
            switcher: SessionSwitcher::new(),
            coordinator: SendCoordinator::new(),
            tx,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Set a conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    // ==================== Accessors ====================

    /// Service handle for executing [`RemoteRequest`]s off the controller.
    pub fn service(&self) -> Arc<dyn ChatServicePort> {
        self.service.clone()
    }

    pub fn registry(&self) -> &SessionRegistry {
        self.registry.registry()
    }

    pub fn registry_status(&self) -> LoadStatus {
        self.registry.status()
    }

    pub fn transcript(&self) -> &Transcript {
        self.transcript.transcript()
    }

    pub fn active(&self) -> &ActiveSession {
        self.switcher.active()
    }

    pub fn send_phase(&self) -> SendPhase {
        self.coordinator.phase(&self.switcher.current_view())
    }

    pub fn is_loading_history(&self) -> bool {
        self.switcher.is_loading()
    }

    // ==================== Commands ====================

    /// Request the initial session listing.
    pub fn request_registry(&self) -> RemoteRequest {
        RemoteRequest::ListSessions
    }

    /// Make `session` active; its history must be fetched with the returned request.
    pub fn switch_to(&mut self, session: SessionId) -> RemoteRequest {
        let mut events = Vec::new();
        let ticket = self
            .switcher
            .switch_to(session, &mut self.transcript, &mut events);
        self.emit(events);
        RemoteRequest::History(ticket)
    }

    /// Make a fresh draft active.
    pub fn start_new(&mut self) {
        let mut events = Vec::new();
        self.switcher.start_new(&mut self.transcript, &mut events);
        self.emit(events);
    }

    /// Append `text` optimistically and return the submission to execute.
    pub fn begin_send(&mut self, text: impl Into<String>) -> Result<RemoteRequest, SendRejected> {
        self.begin_send_ticket(text.into()).map(RemoteRequest::Send)
    }

    /// Apply a resolved request.
    pub fn finalize(&mut self, completion: Completion) {
        match completion {
            Completion::Sessions(result) => {
                let mut events = Vec::new();
                self.registry.finish_load(result, &mut events);
                self.emit(events);
            }
            Completion::History(ticket, result) => {
                let mut events = Vec::new();
                self.switcher
                    .finish_history(ticket, result, &mut self.transcript, &mut events);
                self.emit(events);
            }
            Completion::Send(ticket, result) => {
                self.finalize_send(ticket, result);
            }
        }
    }

    // ==================== Inline drivers ====================

    /// Fetch and apply the session listing.
    pub async fn load_registry(&mut self) {
        let completion = self.request_registry().execute(self.service()).await;
        self.finalize(completion);
    }

    /// Switch to `session` and wait for its history.
    pub async fn open(&mut self, session: SessionId) {
        let request = self.switch_to(session);
        let completion = request.execute(self.service()).await;
        self.finalize(completion);
    }

    /// Send `text` and wait for the reply to be reconciled.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<SendOutcome, SendRejected> {
        let ticket = self.begin_send_ticket(text.into())?;
        let result = self
            .service
            .send_message(&ticket.text, ticket.session())
            .await;
        Ok(self.finalize_send(ticket, result))
    }

    fn begin_send_ticket(&mut self, text: String) -> Result<SendTicket, SendRejected> {
        let mut events = Vec::new();
        let result = self
            .coordinator
            .begin(text, &self.switcher, &mut self.transcript, &mut events);
        self.emit(events);
        let ticket = result?;
        self.conversation_logger.log(ConversationEvent::new(
            "message_sent",
            json!({
                "send_id": ticket.id,
                "session": ticket.session().map(SessionId::as_str),
                "text": ticket.text,
            }),
        ));
        Ok(ticket)
    }

    fn finalize_send(
        &mut self,
        ticket: SendTicket,
        result: Result<SendReply, RemoteError>,
    ) -> SendOutcome {
        let send_id = ticket.id;
        let reply_text = result.as_ref().ok().map(|r| r.message.render_text());
        let mut events = Vec::new();
        let outcome = self.coordinator.finalize(
            ticket,
            result,
            &mut self.switcher,
            &mut self.registry,
            &mut self.transcript,
            &mut events,
        );
        self.emit(events);
        self.log_outcome(send_id, &outcome, reply_text);
        outcome
    }

    fn log_outcome(&self, send_id: u64, outcome: &SendOutcome, reply_text: Option<String>) {
        let created = match outcome {
            SendOutcome::Reconciled { created } | SendOutcome::Stale { created } => created,
            SendOutcome::Failed(_) => &None,
        };
        if let Some(session) = created {
            self.conversation_logger.log(ConversationEvent::new(
                "session_created",
                json!({ "send_id": send_id, "id": session.id.as_str(), "title": session.title }),
            ));
        }
        let event = match outcome {
            SendOutcome::Reconciled { .. } => ConversationEvent::new(
                "reply_received",
                json!({
                    "send_id": send_id,
                    "session": self.active().session_id().map(SessionId::as_str),
                    "text": reply_text,
                }),
            ),
            SendOutcome::Stale { .. } => ConversationEvent::new(
                "reply_dropped",
                json!({ "send_id": send_id, "text": reply_text }),
            ),
            SendOutcome::Failed(error) => ConversationEvent::new(
                "send_failed",
                json!({ "send_id": send_id, "error": error.message }),
            ),
        };
        self.conversation_logger.log(event);
    }

    fn emit(&self, events: Vec<UiEvent>) {
        for event in events {
            debug!("ui event: {:?}", event);
            // Receiver may be gone during shutdown
            let _ = self.tx.send(event);
        }
    }
}
