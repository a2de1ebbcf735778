use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use tracing::{debug, info, warn};

use lingo_core::model::SessionId;
use lingo_core::{ContentCatalog, RewardConfig};

use crate::error::LearnerError;
use crate::session::LearnerSession;

type SharedSession = Arc<Mutex<LearnerSession>>;

/// Live sessions keyed by id.
///
/// Each session sits behind its own lock, so distinct sessions run in
/// parallel. A request for a session that is already handling one fails with
/// `LearnerError::SessionBusy` instead of waiting.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session over shared content and register it.
    pub fn create(&self, catalog: Arc<ContentCatalog>, rewards: Arc<RewardConfig>) -> SessionId {
        self.insert(LearnerSession::new(catalog, rewards))
    }

    /// Register `session` under its own id, replacing any session with that id.
    pub fn insert(&self, session: LearnerSession) -> SessionId {
        let id = session.id();
        self.map().insert(id, Arc::new(Mutex::new(session)));
        info!(session = %id, "session registered");
        id
    }

    /// Run `f` against the session with `id`.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::UnknownSession` if no such session exists,
    /// `LearnerError::SessionBusy` if it is handling another request,
    /// `LearnerError::InvalidState` if an earlier request panicked while
    /// holding it, or whatever `f` returns.
    pub fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut LearnerSession) -> Result<T, LearnerError>,
    ) -> Result<T, LearnerError> {
        let shared = self
            .map()
            .get(&id)
            .cloned()
            .ok_or(LearnerError::UnknownSession(id))?;

        let mut session = match shared.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                debug!(session = %id, "session busy");
                return Err(LearnerError::SessionBusy(id));
            }
            Err(TryLockError::Poisoned(_)) => {
                return Err(LearnerError::InvalidState("session was poisoned by a failed request"));
            }
        };
        f(&mut session).inspect_err(|err| warn!(session = %id, error = %err, "request rejected"))
    }

    /// Drop the session with `id`, returning whether it existed.
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self.map().remove(&id).is_some();
        if removed {
            info!(session = %id, "session removed");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, id: SessionId) -> bool {
        self.map().contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map guard is never held across user code, so a poisoned map is
    // still consistent.
    fn map(&self) -> MutexGuard<'_, HashMap<SessionId, SharedSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::time::fixed_clock;

    fn session() -> LearnerSession {
        LearnerSession::new(
            Arc::new(ContentCatalog::builtin().unwrap()),
            Arc::new(RewardConfig::builtin().unwrap()),
        )
        .with_clock(fixed_clock())
        .with_seed(3)
    }

    #[test]
    fn unknown_session_is_reported() {
        let registry = SessionRegistry::new();
        let id = SessionId::generate();
        let err = registry.with_session(id, |_| Ok(())).unwrap_err();
        assert!(matches!(err, LearnerError::UnknownSession(found) if found == id));
    }

    #[test]
    fn reentrant_request_is_busy() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session());

        let inner = registry
            .with_session(id, |_| registry.with_session(id, |_| Ok(())))
            .unwrap_err();

        assert!(matches!(inner, LearnerError::SessionBusy(found) if found == id));
        // The outer request released the lock.
        registry.with_session(id, |_| Ok(())).unwrap();
    }

    #[test]
    fn distinct_sessions_run_in_parallel() {
        let registry = SessionRegistry::new();
        let ids: Vec<SessionId> = (0..4).map(|_| registry.insert(session())).collect();

        std::thread::scope(|scope| {
            for &id in &ids {
                let registry = &registry;
                scope.spawn(move || {
                    for _ in 0..3 {
                        registry
                            .with_session(id, |s| s.send_message("hola").map(|_| ()))
                            .unwrap();
                    }
                });
            }
        });

        for id in ids {
            let chats = registry
                .with_session(id, |s| Ok(s.progress().conversations_had()))
                .unwrap();
            assert_eq!(chats, 3);
        }
    }

    #[test]
    fn remove_forgets_the_session() {
        let registry = SessionRegistry::new();
        let id = registry.create(
            Arc::new(ContentCatalog::builtin().unwrap()),
            Arc::new(RewardConfig::builtin().unwrap()),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
        assert!(!registry.contains(id));
    }
}
