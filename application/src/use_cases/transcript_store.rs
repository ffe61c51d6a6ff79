//! Transcript Store
//!
//! Owns the transcript of the active session. Only the switcher and the
//! send coordinator mutate it, through the methods below.

use crate::ports::chat_service::{ChatServicePort, RemoteError};
use crate::ports::ui_event::UiEvent;
use chatsync_domain::{Delivery, DomainError, EntryIndex, Message, SessionId, Transcript};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TranscriptStore {
    transcript: Transcript,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Fetch the full history of `session`. Does not touch the store.
    pub async fn load_history(
        service: &dyn ChatServicePort,
        session: &SessionId,
    ) -> Result<Vec<Message>, RemoteError> {
        debug!("Loading history for session {}", session);
        service.load_history(session).await
    }

    /// Clear to the empty transcript.
    pub fn reset(&mut self, events: &mut Vec<UiEvent>) {
        self.transcript.clear();
        events.push(UiEvent::TranscriptReplaced {
            entries: Vec::new(),
        });
    }

    /// Replace everything with confirmed history.
    pub fn replace(&mut self, messages: Vec<Message>, events: &mut Vec<UiEvent>) {
        self.transcript = Transcript::from_history(messages);
        events.push(UiEvent::TranscriptReplaced {
            entries: self.transcript.entries().to_vec(),
        });
    }

    /// Optimistic append of a user message; no network involved.
    pub fn append_local(
        &mut self,
        message: Message,
        events: &mut Vec<UiEvent>,
    ) -> Result<EntryIndex, DomainError> {
        let index = self.transcript.push_pending(message.clone())?;
        events.push(UiEvent::MessageAppended {
            index,
            message,
            delivery: Delivery::Pending,
        });
        Ok(index)
    }

    /// Append a reply once its round-trip resolved, confirming `pending`.
    pub fn append_confirmed(
        &mut self,
        pending: EntryIndex,
        reply: Message,
        events: &mut Vec<UiEvent>,
    ) -> Result<EntryIndex, DomainError> {
        let index = self.transcript.confirm_with_reply(pending, reply.clone())?;
        events.push(UiEvent::DeliveryChanged {
            index: pending,
            delivery: Delivery::Confirmed,
        });
        events.push(UiEvent::MessageAppended {
            index,
            message: reply,
            delivery: Delivery::Confirmed,
        });
        Ok(index)
    }

    pub fn mark_failed(
        &mut self,
        pending: EntryIndex,
        events: &mut Vec<UiEvent>,
    ) -> Result<(), DomainError> {
        self.transcript.mark_failed(pending)?;
        events.push(UiEvent::DeliveryChanged {
            index: pending,
            delivery: Delivery::Failed,
        });
        Ok(())
    }
}
