//! Session Registry store
//!
//! Holds the sidebar's list of sessions. It is filled once from the service
//! at startup and afterwards only grows at the front when a send creates a
//! new session.

use crate::ports::chat_service::{ChatServicePort, RemoteError};
use crate::ports::ui_event::{ErrorContext, ErrorEvent, UiEvent};
use chatsync_domain::{ActiveSession, PrependOutcome, Session, SessionId, SessionRegistry};
use tracing::{info, warn};

/// State of the initial listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loaded,
    Failed,
}

#[derive(Debug, Default)]
pub struct SessionRegistryStore {
    registry: SessionRegistry,
    status: LoadStatus,
}

impl SessionRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Fetch every known session. Does not touch the store.
    pub async fn load(service: &dyn ChatServicePort) -> Result<Vec<Session>, RemoteError> {
        service.list_sessions().await
    }

    /// Apply the listing. A failure leaves the registry exactly as it was.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<Session>, RemoteError>,
        events: &mut Vec<UiEvent>,
    ) {
        match result {
            Ok(sessions) => {
                let listed = sessions.len();
                self.registry.absorb_listing(sessions);
                self.status = LoadStatus::Loaded;
                info!(
                    "Loaded {} sessions ({} after de-duplication)",
                    listed,
                    self.registry.len()
                );
                events.push(UiEvent::RegistryLoaded {
                    sessions: self.registry.sessions().to_vec(),
                });
            }
            Err(e) => {
                self.status = LoadStatus::Failed;
                warn!("Session listing failed: {}", e);
                events.push(UiEvent::Error(ErrorEvent::new(
                    ErrorContext::LoadRegistry,
                    e.to_string(),
                )));
            }
        }
    }

    /// Put a newly created session at the front without ever duplicating it.
    pub fn prepend(
        &mut self,
        session: Session,
        active: &ActiveSession,
        events: &mut Vec<UiEvent>,
    ) -> PrependOutcome {
        let id = session.id.clone();
        let outcome = self.registry.prepend(session);
        match outcome {
            PrependOutcome::Inserted => info!("Registered new session {}", id),
            PrependOutcome::Moved | PrependOutcome::Unchanged => {
                warn!("Session {} was already registered; moved to front", id)
            }
        }
        self.changed(active, events);
        outcome
    }

    /// Refresh a title echoed back by the service.
    pub fn retitle(
        &mut self,
        id: &SessionId,
        title: &str,
        active: &ActiveSession,
        events: &mut Vec<UiEvent>,
    ) {
        if self.registry.retitle(id, title) {
            self.changed(active, events);
        }
    }

    fn changed(&self, active: &ActiveSession, events: &mut Vec<UiEvent>) {
        events.push(UiEvent::RegistryChanged {
            sessions: self.registry.sessions().to_vec(),
            active: active.clone(),
        });
    }
}
