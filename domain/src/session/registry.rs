//! Ordered registry of known chat sessions.

use super::entities::{Session, SessionId};

/// What [`SessionRegistry::prepend`] did with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrependOutcome {
    /// The id was new and now sits at the front.
    Inserted,
    /// The id was already known; its entry moved to the front.
    Moved,
    /// The id was already at the front; only the title may have changed.
    Unchanged,
}

/// Ordered list of known sessions (Aggregate)
///
/// Ids are unique within the registry. Newest-known sessions sit at the
/// front, which is the display order the sidebar uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a service listing, dropping repeated ids.
    ///
    /// The first occurrence of an id wins, so server order is preserved.
    pub fn from_listing(sessions: impl IntoIterator<Item = Session>) -> Self {
        let mut registry = Self::new();
        for session in sessions {
            if !registry.contains(&session.id) {
                registry.sessions.push(session);
            }
        }
        registry
    }

    /// Insert a newly created session at the front.
    ///
    /// An id that is already present is never duplicated: its entry moves to
    /// the front, and its title is replaced when the new one is non-empty.
    pub fn prepend(&mut self, session: Session) -> PrependOutcome {
        match self.position(&session.id) {
            None => {
                self.sessions.insert(0, session);
                PrependOutcome::Inserted
            }
            Some(index) => {
                let mut existing = self.sessions.remove(index);
                if !session.title.trim().is_empty() {
                    existing.title = session.title;
                }
                self.sessions.insert(0, existing);
                if index == 0 {
                    PrependOutcome::Unchanged
                } else {
                    PrependOutcome::Moved
                }
            }
        }
    }

    /// Merge a service listing into a registry that may already hold
    /// sessions created locally before the listing arrived.
    ///
    /// Local sessions missing from the listing stay at the front in their
    /// current order; the listing follows, de-duplicated.
    pub fn absorb_listing(&mut self, sessions: impl IntoIterator<Item = Session>) {
        let listed = Self::from_listing(sessions);
        let mut merged: Vec<Session> = self
            .sessions
            .drain(..)
            .filter(|local| !listed.contains(&local.id))
            .collect();
        merged.extend(listed.sessions);
        self.sessions = merged;
    }

    /// Refresh the title of a known session without moving it.
    pub fn retitle(&mut self, id: &SessionId, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        match self.sessions.iter_mut().find(|s| &s.id == id) {
            Some(session) if session.title != title => {
                session.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| &s.id == id)
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Session at a display position (0-based).
    pub fn at(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, title: &str) -> Session {
        Session::new(SessionId::new(id).unwrap(), title)
    }

    fn ids(registry: &SessionRegistry) -> Vec<&str> {
        registry.sessions().iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn listing_drops_repeated_ids() {
        let registry = SessionRegistry::from_listing(vec![
            session("a", "A"),
            session("b", "B"),
            session("a", "A again"),
        ]);
        assert_eq!(ids(&registry), vec!["a", "b"]);
        assert_eq!(registry.get(&SessionId::new("a").unwrap()).unwrap().title, "A");
    }

    #[test]
    fn prepend_new_session_goes_first() {
        let mut registry = SessionRegistry::from_listing(vec![session("a", "A")]);
        assert_eq!(registry.prepend(session("c1", "T")), PrependOutcome::Inserted);
        assert_eq!(ids(&registry), vec!["c1", "a"]);
    }

    #[test]
    fn prepend_known_id_moves_without_duplicating() {
        let mut registry =
            SessionRegistry::from_listing(vec![session("a", "A"), session("b", "B")]);
        assert_eq!(registry.prepend(session("b", "Renamed")), PrependOutcome::Moved);
        assert_eq!(ids(&registry), vec!["b", "a"]);
        assert_eq!(registry.at(0).unwrap().title, "Renamed");

        assert_eq!(registry.prepend(session("b", "")), PrependOutcome::Unchanged);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.at(0).unwrap().title, "Renamed");
    }

    #[test]
    fn absorb_keeps_local_sessions_missing_from_listing() {
        let mut registry = SessionRegistry::new();
        registry.prepend(session("fresh", "Fresh"));
        registry.prepend(session("b", "B local"));

        registry.absorb_listing(vec![session("a", "A"), session("b", "B")]);

        assert_eq!(ids(&registry), vec!["fresh", "a", "b"]);
        assert_eq!(registry.at(2).unwrap().title, "B");
    }

    #[test]
    fn retitle_ignores_blank_and_unknown() {
        let mut registry = SessionRegistry::from_listing(vec![session("a", "A")]);
        let a = SessionId::new("a").unwrap();
        assert!(!registry.retitle(&a, " "));
        assert!(!registry.retitle(&SessionId::new("zz").unwrap(), "Z"));
        assert!(registry.retitle(&a, "Better"));
        assert!(!registry.retitle(&a, "Better"));
        assert_eq!(registry.get(&a).unwrap().title, "Better");
    }
}
