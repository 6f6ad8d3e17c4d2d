//! Concurrent session registry.
//!
//! Maps session ids to their game state. Each state sits behind its own
//! async mutex, so requests for different sessions never contend and two
//! requests for the same session are serialized.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::game::session::{SessionId, SessionState};
use crate::game::word::Word;
use crate::game::words::WordSet;

pub type SharedSession = Arc<Mutex<SessionState>>;

/// The session a request ends up bound to.
pub struct ResolvedSession {
    pub id: SessionId,
    pub session: SharedSession,
    /// Whether the session was created for this request (needs a cookie).
    pub is_new: bool,
}

#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionId, SharedSession>>,
    timeout: Duration,
}

impl SessionRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            timeout,
        }
    }

    /// Inactivity after which a session is dropped.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Registers a new session playing for `secret`.
    pub fn create(&self, secret: Word) -> (SessionId, SharedSession) {
        loop {
            let id = SessionId::generate();
            if let Entry::Vacant(slot) = self.sessions.entry(id.clone()) {
                let session = Arc::new(Mutex::new(SessionState::new(secret)));
                slot.insert(Arc::clone(&session));
                tracing::debug!(session = %id, "Session created");
                return (id, session);
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Binds a request to a session.
    ///
    /// A presented id that is live and still playing is reused and its
    /// activity time refreshed. Unknown, expired and finished sessions are
    /// dropped and replaced by a fresh one with a new secret from `words`.
    pub async fn resolve(&self, presented: Option<&SessionId>, words: &dyn WordSet) -> ResolvedSession {
        if let Some(id) = presented {
            if let Some(session) = self.get(id) {
                let retire = {
                    let mut state = session.lock().await;
                    let expired = state.is_expired(self.timeout);
                    let finished = state.status().is_terminal();
                    if !expired && !finished {
                        state.touch();
                    }
                    if expired || finished {
                        tracing::debug!(
                            session = %id,
                            expired,
                            status = state.status().as_str(),
                            "Retiring session"
                        );
                    }
                    expired || finished
                };

                if !retire {
                    return ResolvedSession {
                        id: id.clone(),
                        session,
                        is_new: false,
                    };
                }
                self.remove(id);
            } else {
                tracing::debug!(session = %id, "Unknown session id, issuing a new one");
            }
        }

        let (id, session) = self.create(words.random_word());
        ResolvedSession {
            id,
            session,
            is_new: true,
        }
    }

    /// Drops every expired session that is not currently in use.
    ///
    /// Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut purged = 0;
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(state) if state.is_expired(self.timeout) => {
                purged += 1;
                false
            }
            _ => true,
        });
        purged
    }
}
