//! Session registry for multi-respondent hosting
//!
//! Each session sits behind its own lock. The map shard is released before
//! the caller's closure runs, so slow work on one session (rendering,
//! appending) never stalls sessions that happen to share its shard.

use crate::error::WizardError;
use crate::session::{Session, SessionId};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

type SessionSlot = Arc<Mutex<Session>>;

/// Isolated sessions keyed by [`SessionId`]
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionSlot>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session
    pub fn open(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, Arc::new(Mutex::new(Session::new())));
        tracing::debug!("Opened session {}", id);
        id
    }

    /// Run `f` with exclusive access to one session
    ///
    /// Only that session is locked while `f` runs. `f` may use the registry
    /// freely except for calling `with_session` on the same `id`, which
    /// would wait on itself.
    ///
    /// # Errors
    /// [`WizardError::UnknownSession`] when `id` is not registered.
    pub fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, WizardError> {
        let slot = self
            .sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(WizardError::UnknownSession(id))?;
        let mut session = slot.lock();
        Ok(f(&mut session))
    }

    /// Remove a session, returning its final state
    ///
    /// Waits for any operation still running on the session.
    pub fn close(&self, id: SessionId) -> Option<Session> {
        let removed = self.sessions.remove(&id).map(|(_, slot)| {
            Arc::try_unwrap(slot).map_or_else(|shared| shared.lock().clone(), Mutex::into_inner)
        });
        if removed.is_some() {
            tracing::debug!("Closed session {}", id);
        }
        removed
    }

    /// Number of open sessions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is open
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{MockPersistenceSink, MockReportRenderer};
    use crate::controller::WizardController;
    use crate::record::StageAnswers;
    use crate::session::Submission;
    use crate::stage::Stage;
    use std::sync::mpsc;
    use std::thread;

    fn adult_basics(code: &str) -> Submission {
        Submission::new(
            Stage::Basics,
            StageAnswers::new()
                .with("Registration Code", code)
                .with("Age Group", "31–40")
                .with("Gender", "Other")
                .with("KK Number", "1"),
        )
    }

    #[test]
    fn unknown_session_is_reported() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let err = registry.with_session(id, |_| ()).unwrap_err();
        assert!(matches!(err, WizardError::UnknownSession(missing) if missing == id));
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let controller = WizardController::new(MockReportRenderer::new(), MockPersistenceSink::new());
        let a = registry.open();
        let b = registry.open();

        registry
            .with_session(a, |s| controller.advance(s, &adult_basics("A-1")))
            .unwrap()
            .unwrap();

        assert_eq!(registry.with_session(a, |s| s.stage()).unwrap(), Stage::OwnershipGate);
        assert_eq!(registry.with_session(b, |s| s.stage()).unwrap(), Stage::Basics);
        assert!(registry.with_session(b, |s| s.record().is_empty()).unwrap());
    }

    #[test]
    fn concurrent_sessions_advance_independently() {
        let registry = Arc::new(SessionRegistry::new());
        let controller = Arc::new(WizardController::new(
            MockReportRenderer::new(),
            MockPersistenceSink::new(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let controller = Arc::clone(&controller);
                thread::spawn(move || {
                    let id = registry.open();
                    let code = format!("REG-{i}");
                    registry
                        .with_session(id, |s| controller.advance(s, &adult_basics(&code)))
                        .unwrap()
                        .unwrap();
                    (id, code)
                })
            })
            .collect();

        for handle in handles {
            let (id, code) = handle.join().unwrap();
            let stored = registry
                .with_session(id, |s| s.record().get("Registration Code").map(str::to_string))
                .unwrap();
            assert_eq!(stored.as_deref(), Some(code.as_str()));
        }
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn registry_is_usable_inside_an_operation() {
        let registry = SessionRegistry::new();
        let a = registry.open();

        let (other, count) = registry
            .with_session(a, |_| {
                let other = registry.open();
                let stage = registry.with_session(other, |s| s.stage()).unwrap();
                (stage, registry.len())
            })
            .unwrap();

        assert_eq!(other, Stage::Basics);
        assert_eq!(count, 2);
    }

    #[test]
    fn held_session_does_not_block_others() {
        let registry = Arc::new(SessionRegistry::new());
        let held = registry.open();
        let others: Vec<_> = (0..64).map(|_| registry.open()).collect();

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .with_session(held, |_| {
                        locked_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                    })
                    .unwrap();
            })
        };
        locked_rx.recv().unwrap();

        // Some of these share the held session's shard
        for id in others {
            assert_eq!(registry.with_session(id, |s| s.stage()).unwrap(), Stage::Basics);
        }
        assert_eq!(registry.len(), 65);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
    }

    #[test]
    fn close_removes_session() {
        let registry = SessionRegistry::new();
        let id = registry.open();
        assert!(registry.close(id).is_some());
        assert!(registry.close(id).is_none());
        assert!(registry.is_empty());
    }
}
