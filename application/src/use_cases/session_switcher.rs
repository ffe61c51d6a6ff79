//! Session Switcher
//!
//! Owns the active-session pointer. Moving the pointer is synchronous even
//! though the history fetch behind it is not, so every switch opens a new
//! *view generation*. Work issued for an older generation is stale by
//! definition and must not touch what is on screen now.

use crate::ports::chat_service::RemoteError;
use crate::ports::ui_event::{ErrorContext, ErrorEvent, StaleKind, UiEvent};
use crate::use_cases::transcript_store::TranscriptStore;
use chatsync_domain::{ActiveSession, Message, SessionId};
use tracing::{info, warn};

/// Identity of the view an asynchronous task was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTag {
    pub generation: u64,
    pub target: ActiveSession,
}

/// A pending history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub view: ViewTag,
    pub session: SessionId,
}

#[derive(Debug, Default)]
pub struct SessionSwitcher {
    active: ActiveSession,
    generation: u64,
    /// Generation whose history fetch has not resolved yet.
    loading: Option<u64>,
}

impl SessionSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_view(&self) -> ViewTag {
        ViewTag {
            generation: self.generation,
            target: self.active.clone(),
        }
    }

    pub fn is_current(&self, view: &ViewTag) -> bool {
        view.generation == self.generation
    }

    /// True while the active session's history is still being fetched.
    pub fn is_loading(&self) -> bool {
        self.loading == Some(self.generation)
    }

    /// Make `session` active and clear the transcript until its history arrives.
    pub fn switch_to(
        &mut self,
        session: SessionId,
        transcript: &mut TranscriptStore,
        events: &mut Vec<UiEvent>,
    ) -> HistoryTicket {
        self.generation += 1;
        self.active = ActiveSession::Persisted(session.clone());
        self.loading = Some(self.generation);
        info!("Switched to session {} (view {})", session, self.generation);

        events.push(UiEvent::ActiveChanged {
            active: self.active.clone(),
        });
        transcript.reset(events);
        events.push(UiEvent::HistoryLoading {
            active: self.active.clone(),
        });

        HistoryTicket {
            view: self.current_view(),
            session,
        }
    }

    /// Make the draft active with an empty transcript.
    pub fn start_new(&mut self, transcript: &mut TranscriptStore, events: &mut Vec<UiEvent>) {
        self.generation += 1;
        self.active = ActiveSession::Draft;
        self.loading = None;
        info!("Started new chat (view {})", self.generation);

        events.push(UiEvent::ActiveChanged {
            active: ActiveSession::Draft,
        });
        transcript.reset(events);
    }

    /// Apply a resolved history fetch. Returns `true` when it was applied.
    ///
    /// On failure the transcript stays empty and the pointer stays on the
    /// requested session.
    pub fn finish_history(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<Message>, RemoteError>,
        transcript: &mut TranscriptStore,
        events: &mut Vec<UiEvent>,
    ) -> bool {
        if !self.is_current(&ticket.view) {
            info!(
                "Dropping history for {} issued in view {} (now {})",
                ticket.session, ticket.view.generation, self.generation
            );
            events.push(UiEvent::StaleDropped {
                kind: StaleKind::History,
                issued_for: ticket.view.target,
            });
            return false;
        }

        self.loading = None;
        match result {
            Ok(messages) => {
                info!(
                    "Loaded {} messages for session {}",
                    messages.len(),
                    ticket.session
                );
                transcript.replace(messages, events);
                true
            }
            Err(e) => {
                warn!("History load for {} failed: {}", ticket.session, e);
                events.push(UiEvent::Error(ErrorEvent::new(
                    ErrorContext::LoadHistory,
                    format!("Could not load chat {}: {}", ticket.session, e),
                )));
                false
            }
        }
    }

    /// Give the draft of `view` its service-assigned id.
    ///
    /// Only the send coordinator calls this, on the success path of the first
    /// message of a new session. The generation does not change: the view is
    /// the same, it just learned its identity.
    pub(crate) fn adopt_created(&mut self, view: &ViewTag, session: SessionId) -> bool {
        if !self.is_current(view) || !self.active.is_draft() {
            return false;
        }
        self.active = ActiveSession::Persisted(session);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    #[test]
    fn switch_moves_pointer_immediately_and_clears_transcript() {
        let mut switcher = SessionSwitcher::new();
        let mut transcript = TranscriptStore::new();
        let mut events = Vec::new();
        transcript.replace(vec![Message::user("from before")], &mut events);

        let ticket = switcher.switch_to(id("a"), &mut transcript, &mut events);

        assert!(switcher.active().is(&id("a")));
        assert!(switcher.is_loading());
        assert!(transcript.transcript().is_empty());
        assert_eq!(ticket.session, id("a"));
        assert_eq!(ticket.view, switcher.current_view());
    }

    #[test]
    fn superseded_history_is_dropped() {
        let mut switcher = SessionSwitcher::new();
        let mut transcript = TranscriptStore::new();
        let mut events = Vec::new();

        let first = switcher.switch_to(id("a"), &mut transcript, &mut events);
        let second = switcher.switch_to(id("b"), &mut transcript, &mut events);

        let applied = switcher.finish_history(
            first,
            Ok(vec![Message::user("a-msg")]),
            &mut transcript,
            &mut events,
        );
        assert!(!applied);
        assert!(transcript.transcript().is_empty());
        assert!(switcher.is_loading());

        let applied = switcher.finish_history(
            second,
            Ok(vec![Message::user("b-msg")]),
            &mut transcript,
            &mut events,
        );
        assert!(applied);
        assert!(!switcher.is_loading());
        assert_eq!(transcript.transcript().texts(), vec!["b-msg"]);
    }

    #[test]
    fn failed_history_keeps_pointer_and_empty_transcript() {
        let mut switcher = SessionSwitcher::new();
        let mut transcript = TranscriptStore::new();
        let mut events = Vec::new();

        let ticket = switcher.switch_to(id("a"), &mut transcript, &mut events);
        switcher.finish_history(
            ticket,
            Err(RemoteError::fetch("HTTP 500")),
            &mut transcript,
            &mut events,
        );

        assert!(switcher.active().is(&id("a")));
        assert!(transcript.transcript().is_empty());
        assert!(matches!(
            events.last(),
            Some(UiEvent::Error(ErrorEvent {
                context: ErrorContext::LoadHistory,
                ..
            }))
        ));
    }

    #[test]
    fn adopt_only_applies_to_the_current_draft() {
        let mut switcher = SessionSwitcher::new();
        let mut transcript = TranscriptStore::new();
        let mut events = Vec::new();

        let draft_view = switcher.current_view();
        switcher.start_new(&mut transcript, &mut events);
        assert!(!switcher.adopt_created(&draft_view, id("c1")));
        assert!(switcher.active().is_draft());

        let view = switcher.current_view();
        assert!(switcher.adopt_created(&view, id("c2")));
        assert!(switcher.active().is(&id("c2")));
        assert_eq!(switcher.generation(), view.generation);
    }
}
