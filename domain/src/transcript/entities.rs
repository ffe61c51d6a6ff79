//! Transcript: the ordered message log of one session (or a draft).

use super::message::{Message, Role};
use crate::core::error::DomainError;

/// Delivery state of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Known to the service (loaded from history, or a reconciled reply).
    Confirmed,
    /// Appended optimistically; the send has not resolved yet.
    Pending,
    /// The send failed. The entry stays visible.
    Failed,
}

/// A message plus its delivery state.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub message: Message,
    pub delivery: Delivery,
}

/// Position of an entry inside a [`Transcript`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryIndex(pub usize);

/// Ordered, append-only message log (Aggregate)
///
/// Entries are never reordered or removed individually; the whole log is
/// only ever replaced (history load) or cleared (draft). A reply is only
/// accepted directly after the pending user message it answers, so the log
/// always reads user-then-assistant in send order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript made of confirmed history.
    pub fn from_history(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            entries: messages
                .into_iter()
                .map(|message| TranscriptEntry {
                    message,
                    delivery: Delivery::Confirmed,
                })
                .collect(),
        }
    }

    /// Append an optimistic user message.
    pub fn push_pending(&mut self, message: Message) -> Result<EntryIndex, DomainError> {
        if message.content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        self.entries.push(TranscriptEntry {
            message,
            delivery: Delivery::Pending,
        });
        Ok(EntryIndex(self.entries.len() - 1))
    }

    /// Confirm the pending entry at `index` and append its reply right after it.
    pub fn confirm_with_reply(
        &mut self,
        index: EntryIndex,
        reply: Message,
    ) -> Result<EntryIndex, DomainError> {
        let last = self
            .entries
            .len()
            .checked_sub(1)
            .ok_or(DomainError::UnknownEntry(index.0))?;
        let entry = self
            .entries
            .get_mut(index.0)
            .ok_or(DomainError::UnknownEntry(index.0))?;
        if entry.delivery != Delivery::Pending {
            return Err(DomainError::NotAwaitingReply(index.0));
        }
        if index.0 != last {
            return Err(DomainError::ReplyOutOfOrder {
                expected: index.0,
                last,
            });
        }
        entry.delivery = Delivery::Confirmed;
        self.entries.push(TranscriptEntry {
            message: reply,
            delivery: Delivery::Confirmed,
        });
        Ok(EntryIndex(self.entries.len() - 1))
    }

    /// Mark a pending entry as failed.
    pub fn mark_failed(&mut self, index: EntryIndex) -> Result<(), DomainError> {
        let entry = self
            .entries
            .get_mut(index.0)
            .ok_or(DomainError::UnknownEntry(index.0))?;
        if entry.delivery != Delivery::Pending {
            return Err(DomainError::NotAwaitingReply(index.0));
        }
        entry.delivery = Delivery::Failed;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True while an optimistic message is waiting for its reply.
    pub fn is_provisional(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.delivery == Delivery::Pending)
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn get(&self, index: EntryIndex) -> Option<&TranscriptEntry> {
        self.entries.get(index.0)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().map(|entry| &entry.message)
    }

    /// Rendered text of every message, in order.
    pub fn texts(&self) -> Vec<String> {
        self.messages().map(Message::render_text).collect()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.messages().map(|m| m.role).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
