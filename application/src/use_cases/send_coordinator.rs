//! Send Coordinator
//!
//! Runs one logical send through
//! `Idle -> Optimistic -> AwaitingReply -> {Reconciled | Failed} -> Idle`:
//!
//! 1. **Optimistic** — the user message is appended locally right away.
//! 2. **AwaitingReply** — the message is submitted; the caller keeps control.
//! 3. **Reconciled** — the reply is appended after its user message. For the
//!    first message of a new session the created session is registered
//!    first, then becomes active.
//! 4. **Failed** — the error is reported and the user message stays visible,
//!    marked as failed (see [`NO_ROLLBACK_ON_SEND_FAILURE`]).
//!
//! Every send carries the [`ViewTag`] it was issued for. A reply whose view
//! is no longer current never reaches the transcript; a session it created
//! is still registered.
//!
//! At most one send per persisted session is in flight at a time, even
//! across views: reopening a session while its earlier send is pending does
//! not allow a second one. Drafts are tracked per view.

use crate::ports::chat_service::{RemoteError, SendReply};
use crate::ports::ui_event::{ErrorContext, ErrorEvent, StaleKind, UiEvent};
use crate::use_cases::registry_store::SessionRegistryStore;
use crate::use_cases::session_switcher::{SessionSwitcher, ViewTag};
use crate::use_cases::transcript_store::TranscriptStore;
use chatsync_domain::util::preview;
use chatsync_domain::{
    ActiveSession, DomainError, EntryIndex, Message, Role, Session, SessionId,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A failed send keeps its optimistic user message in the transcript,
/// marked [`Delivery::Failed`](chatsync_domain::Delivery::Failed), instead of
/// removing it. There is no automatic retry.
pub const NO_ROLLBACK_ON_SEND_FAILURE: bool = true;

/// Why a send was refused before anything was appended.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendRejected {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Still waiting for the reply to the previous message")]
    InFlight,

    #[error("Chat history is still loading")]
    HistoryLoading,

    #[error("Could not append message: {0}")]
    Transcript(#[from] DomainError),
}

/// Coordinator state for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    AwaitingReply { ticket: u64 },
}

/// A send that has been appended optimistically and must be finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    pub id: u64,
    pub view: ViewTag,
    pub text: String,
    /// Where the optimistic user message sits in the transcript of `view`.
    pub entry: EntryIndex,
}

impl SendTicket {
    /// Session id to submit with, `None` for a draft.
    pub fn session(&self) -> Option<&SessionId> {
        self.view.target.session_id()
    }
}

/// How a send ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Reply appended to the transcript.
    Reconciled { created: Option<Session> },
    /// The view changed before the reply arrived; the reply was not shown.
    Stale { created: Option<Session> },
    /// The send failed and was reported.
    Failed(RemoteError),
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: u64,
    view: ViewTag,
}

impl InFlight {
    /// Whether this send blocks a new one from `view`.
    fn blocks(&self, view: &ViewTag) -> bool {
        if self.view.generation == view.generation {
            return true;
        }
        match (self.view.target.session_id(), view.target.session_id()) {
            (Some(pending), Some(current)) => pending == current,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SendCoordinator {
    in_flight: Vec<InFlight>,
    next_ticket: u64,
}

impl SendCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase as seen from `view`. Pending sends of older views only block
    /// it when they went to the same session.
    pub fn phase(&self, view: &ViewTag) -> SendPhase {
        match self.in_flight.iter().find(|f| f.blocks(view)) {
            Some(f) => SendPhase::AwaitingReply { ticket: f.ticket },
            None => SendPhase::Idle,
        }
    }

    /// Optimistic step: validate, append the user message, hand out a ticket.
    pub fn begin(
        &mut self,
        text: String,
        switcher: &SessionSwitcher,
        transcript: &mut TranscriptStore,
        events: &mut Vec<UiEvent>,
    ) -> Result<SendTicket, SendRejected> {
        if text.trim().is_empty() {
            return Err(SendRejected::EmptyInput);
        }
        if switcher.is_loading() {
            return Err(SendRejected::HistoryLoading);
        }
        let view = switcher.current_view();
        if let SendPhase::AwaitingReply { ticket } = self.phase(&view) {
            debug!("Send refused: ticket {} still awaiting reply", ticket);
            return Err(SendRejected::InFlight);
        }

        let entry = transcript.append_local(Message::user(text.clone()), events)?;
        self.next_ticket += 1;
        let ticket = SendTicket {
            id: self.next_ticket,
            view,
            text,
            entry,
        };
        self.in_flight.push(InFlight {
            ticket: ticket.id,
            view: ticket.view.clone(),
        });
        info!(
            "Send #{} to {} awaiting reply: {}",
            ticket.id,
            ticket.view.target,
            preview(&ticket.text, 60)
        );
        Ok(ticket)
    }

    /// Reconcile a resolved send with the current state.
    pub fn finalize(
        &mut self,
        ticket: SendTicket,
        result: Result<SendReply, RemoteError>,
        switcher: &mut SessionSwitcher,
        registry: &mut SessionRegistryStore,
        transcript: &mut TranscriptStore,
        events: &mut Vec<UiEvent>,
    ) -> SendOutcome {
        self.in_flight.retain(|f| f.ticket != ticket.id);

        let result = result.and_then(|reply| Self::check_identity(&ticket, reply));
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => return self.fail(ticket, e, switcher, transcript, events),
        };

        let current = switcher.is_current(&ticket.view);
        let created = match (&ticket.view.target, reply.chat) {
            (ActiveSession::Draft, Some(chat)) => {
                // registry first, so no frame shows an id the sidebar lacks
                let active = if current {
                    ActiveSession::Persisted(chat.id.clone())
                } else {
                    switcher.active().clone()
                };
                registry.prepend(chat.clone(), &active, events);
                Some(chat)
            }
            (ActiveSession::Persisted(id), Some(echo)) => {
                if &echo.id == id {
                    registry.retitle(id, &echo.title, switcher.active(), events);
                } else {
                    warn!(
                        "Reply for session {} echoed a different session {}; ignoring echo",
                        id, echo.id
                    );
                }
                None
            }
            (_, None) => None,
        };

        if !current {
            info!(
                "Dropping reply to send #{} issued for {} (view {} is no longer active)",
                ticket.id, ticket.view.target, ticket.view.generation
            );
            events.push(UiEvent::StaleDropped {
                kind: StaleKind::Reply,
                issued_for: ticket.view.target,
            });
            return SendOutcome::Stale { created };
        }

        if let Some(chat) = &created
            && switcher.adopt_created(&ticket.view, chat.id.clone())
        {
            events.push(UiEvent::ActiveChanged {
                active: switcher.active().clone(),
            });
        }

        match transcript.append_confirmed(ticket.entry, reply.message, events) {
            Ok(_) => {
                info!("Send #{} reconciled", ticket.id);
                SendOutcome::Reconciled { created }
            }
            Err(e) => {
                warn!("Reply to send #{} could not be appended: {}", ticket.id, e);
                let error = RemoteError::parse(e.to_string());
                events.push(UiEvent::Error(ErrorEvent::new(
                    ErrorContext::Send,
                    error.to_string(),
                )));
                SendOutcome::Failed(error)
            }
        }
    }

    /// A reply must come from the assistant, and a reply to a draft must say
    /// which session it created.
    fn check_identity(ticket: &SendTicket, reply: SendReply) -> Result<SendReply, RemoteError> {
        if reply.message.role != Role::Assistant {
            return Err(RemoteError::parse(format!(
                "reply has role '{}', expected 'assistant'",
                reply.message.role
            )));
        }
        if ticket.view.target.is_draft() && reply.chat.is_none() {
            return Err(RemoteError::parse(
                "reply to a new chat did not include the created chat",
            ));
        }
        Ok(reply)
    }

    fn fail(
        &mut self,
        ticket: SendTicket,
        error: RemoteError,
        switcher: &SessionSwitcher,
        transcript: &mut TranscriptStore,
        events: &mut Vec<UiEvent>,
    ) -> SendOutcome {
        warn!("Send #{} failed: {}", ticket.id, error);
        if NO_ROLLBACK_ON_SEND_FAILURE
            && switcher.is_current(&ticket.view)
            && let Err(e) = transcript.mark_failed(ticket.entry, events)
        {
            warn!("Could not mark send #{} as failed: {}", ticket.id, e);
        }
        events.push(UiEvent::Error(ErrorEvent::new(
            ErrorContext::Send,
            error.to_string(),
        )));
        SendOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_domain::Delivery;

    struct Fixture {
        coordinator: SendCoordinator,
        switcher: SessionSwitcher,
        registry: SessionRegistryStore,
        transcript: TranscriptStore,
        events: Vec<UiEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                coordinator: SendCoordinator::new(),
                switcher: SessionSwitcher::new(),
                registry: SessionRegistryStore::new(),
                transcript: TranscriptStore::new(),
                events: Vec::new(),
            }
        }

        fn begin(&mut self, text: &str) -> Result<SendTicket, SendRejected> {
            self.coordinator.begin(
                text.to_string(),
                &self.switcher,
                &mut self.transcript,
                &mut self.events,
            )
        }

        fn finalize(
            &mut self,
            ticket: SendTicket,
            result: Result<SendReply, RemoteError>,
        ) -> SendOutcome {
            self.coordinator.finalize(
                ticket,
                result,
                &mut self.switcher,
                &mut self.registry,
                &mut self.transcript,
                &mut self.events,
            )
        }
    }

    fn created(id: &str, title: &str, text: &str) -> SendReply {
        SendReply {
            chat: Some(Session::new(SessionId::new(id).unwrap(), title)),
            message: Message::assistant(text),
        }
    }

    #[test]
    fn blank_input_is_rejected_without_side_effects() {
        let mut f = Fixture::new();
        assert_eq!(f.begin("   ").unwrap_err(), SendRejected::EmptyInput);
        assert!(f.transcript.transcript().is_empty());
        assert!(f.events.is_empty());
    }

    #[test]
    fn second_send_in_same_view_is_rejected() {
        let mut f = Fixture::new();
        let ticket = f.begin("one").unwrap();
        assert_eq!(
            f.coordinator.phase(&f.switcher.current_view()),
            SendPhase::AwaitingReply { ticket: ticket.id }
        );
        assert_eq!(f.begin("two").unwrap_err(), SendRejected::InFlight);
        assert_eq!(f.transcript.transcript().len(), 1);
    }

    #[test]
    fn pending_send_of_old_view_does_not_block_new_draft() {
        let mut f = Fixture::new();
        f.begin("one").unwrap();
        f.switcher.start_new(&mut f.transcript, &mut f.events);

        assert_eq!(f.coordinator.phase(&f.switcher.current_view()), SendPhase::Idle);
        assert!(f.begin("two").is_ok());
    }

    #[test]
    fn draft_reply_registers_then_activates() {
        let mut f = Fixture::new();
        let ticket = f.begin("hi").unwrap();
        f.events.clear();

        let outcome = f.finalize(ticket, Ok(created("c1", "T", "hello")));

        assert!(matches!(outcome, SendOutcome::Reconciled { created: Some(_) }));
        assert!(f.switcher.active().is(&SessionId::new("c1").unwrap()));
        let registry_pos = f
            .events
            .iter()
            .position(|e| matches!(e, UiEvent::RegistryChanged { .. }))
            .unwrap();
        let active_pos = f
            .events
            .iter()
            .position(|e| matches!(e, UiEvent::ActiveChanged { .. }))
            .unwrap();
        assert!(registry_pos < active_pos);
        assert_eq!(f.coordinator.phase(&f.switcher.current_view()), SendPhase::Idle);
    }

    #[test]
    fn draft_reply_without_chat_is_a_failure() {
        let mut f = Fixture::new();
        let ticket = f.begin("hi").unwrap();
        let entry = ticket.entry;

        let outcome = f.finalize(
            ticket,
            Ok(SendReply {
                chat: None,
                message: Message::assistant("orphan"),
            }),
        );

        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert!(f.switcher.active().is_draft());
        assert!(f.registry.registry().is_empty());
        assert_eq!(
            f.transcript.transcript().get(entry).unwrap().delivery,
            Delivery::Failed
        );
    }

    #[test]
    fn failure_keeps_user_message_marked_failed() {
        let mut f = Fixture::new();
        let ticket = f.begin("hi").unwrap();

        let outcome = f.finalize(ticket, Err(RemoteError::fetch("HTTP 502 Bad Gateway")));

        assert!(matches!(outcome, SendOutcome::Failed(_)));
        let entries = f.transcript.transcript().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].delivery, Delivery::Failed);
        assert!(matches!(
            f.events.last(),
            Some(UiEvent::Error(ErrorEvent {
                context: ErrorContext::Send,
                ..
            }))
        ));
        assert_eq!(f.coordinator.phase(&f.switcher.current_view()), SendPhase::Idle);
    }

    #[test]
    fn stale_draft_reply_registers_but_leaves_view_alone() {
        let mut f = Fixture::new();
        let ticket = f.begin("hi").unwrap();
        f.switcher.start_new(&mut f.transcript, &mut f.events);

        let outcome = f.finalize(ticket, Ok(created("c9", "Late", "hello")));

        assert!(matches!(outcome, SendOutcome::Stale { created: Some(_) }));
        assert!(f.switcher.active().is_draft());
        assert!(f.transcript.transcript().is_empty());
        assert!(
            f.registry
                .registry()
                .contains(&SessionId::new("c9").unwrap())
        );
    }

    #[test]
    fn echo_for_existing_session_refreshes_title() {
        let mut f = Fixture::new();
        let id = SessionId::new("a").unwrap();
        f.registry
            .prepend(Session::untitled(id.clone()), &ActiveSession::Draft, &mut f.events);
        let ticket = f.switcher.switch_to(id.clone(), &mut f.transcript, &mut f.events);
        f.switcher
            .finish_history(ticket, Ok(vec![]), &mut f.transcript, &mut f.events);

        let send = f.begin("hi").unwrap();
        f.finalize(send, Ok(created("a", "Named now", "ok")));

        assert_eq!(f.registry.registry().get(&id).unwrap().title, "Named now");
        assert_eq!(f.registry.registry().len(), 1);
    }

    fn open(f: &mut Fixture, id: &str) -> SessionId {
        let id = SessionId::new(id).unwrap();
        let ticket = f.switcher.switch_to(id.clone(), &mut f.transcript, &mut f.events);
        f.switcher
            .finish_history(ticket, Ok(vec![]), &mut f.transcript, &mut f.events);
        id
    }

    #[test]
    fn reopened_session_with_pending_send_refuses_another() {
        let mut f = Fixture::new();
        open(&mut f, "a");
        let first = f.begin("one").unwrap();

        open(&mut f, "b");
        assert!(f.begin("elsewhere").is_ok());

        open(&mut f, "a");
        assert_eq!(
            f.coordinator.phase(&f.switcher.current_view()),
            SendPhase::AwaitingReply { ticket: first.id }
        );
        assert_eq!(f.begin("two").unwrap_err(), SendRejected::InFlight);
        assert!(f.transcript.transcript().is_empty());

        f.finalize(first, Ok(created("a", "A", "late")));
        assert_eq!(f.coordinator.phase(&f.switcher.current_view()), SendPhase::Idle);
        assert!(f.begin("two").is_ok());
    }

    #[test]
    fn reply_from_user_role_is_rejected() {
        let mut f = Fixture::new();
        open(&mut f, "a");
        let ticket = f.begin("hi").unwrap();
        let entry = ticket.entry;

        let outcome = f.finalize(
            ticket,
            Ok(SendReply {
                chat: None,
                message: Message::user("echoed back"),
            }),
        );

        assert!(matches!(
            outcome,
            SendOutcome::Failed(RemoteError {
                kind: crate::ports::chat_service::RemoteErrorKind::Parse,
                ..
            })
        ));
        assert_eq!(f.transcript.transcript().len(), 1);
        assert_eq!(
            f.transcript.transcript().get(entry).unwrap().delivery,
            Delivery::Failed
        );
    }
}
