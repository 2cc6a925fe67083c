use std::collections::HashMap;
use std::hash::Hash;

use crate::session::{AutocompleteSession, SessionConfig};

/// Sessions keyed by input element identity.
///
/// Owned by the adapter that enhances inputs: a session is created when an
/// input is enhanced and dropped when that input leaves the page.
#[derive(Debug)]
pub struct SessionRegistry<K> {
    config: SessionConfig,
    sessions: HashMap<K, AutocompleteSession>,
}

impl<K: Eq + Hash> SessionRegistry<K> {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    /// Returns the session for `key`, creating it on first enhancement.
    /// Enhancing an input twice keeps its existing session.
    pub fn enhance(&mut self, key: K) -> &mut AutocompleteSession {
        let config = self.config;
        self.sessions
            .entry(key)
            .or_insert_with(|| AutocompleteSession::new(config))
    }

    #[must_use]
    pub fn is_enhanced(&self, key: &K) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut AutocompleteSession> {
        self.sessions.get_mut(key)
    }

    /// Destroys the session for a detached input.
    pub fn detach(&mut self, key: &K) -> Option<AutocompleteSession> {
        self.sessions.remove(key)
    }

    /// Drops every session whose input fails `is_attached`.
    pub fn retain_attached(&mut self, mut is_attached: impl FnMut(&K) -> bool) {
        self.sessions.retain(|key, _| is_attached(key));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
