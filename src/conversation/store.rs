//! Session store — in-memory map from user identity to in-progress report.
//!
//! A single coarse lock guards the whole map. Event volume is tiny, and
//! holding the lock for a full update serializes handling per user.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::state::{Session, Step};

/// Process-wide session storage, shared by `Arc`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `f` on a user's session slot while holding the write lock.
    ///
    /// The session is taken out of the map for the duration of `f`; whatever
    /// is left in the slot afterwards is stored back (`None` removes it).
    pub async fn update<F, R>(&self, user_id: i64, f: F) -> R
    where
        F: FnOnce(&mut Option<Session>) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let mut slot = sessions.remove(&user_id);
        let out = f(&mut slot);
        if let Some(session) = slot {
            sessions.insert(user_id, session);
        }
        out
    }

    /// Snapshot of a user's session.
    pub async fn get(&self, user_id: i64) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// The user's current step; `Idle` when no report is in progress.
    pub async fn step(&self, user_id: i64) -> Step {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .map(|s| s.step)
            .unwrap_or(Step::Idle)
    }

    /// Number of reports currently in progress.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
