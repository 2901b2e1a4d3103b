//! In-memory session slots
//!
//! Each browser tab gets its own [`SessionState`] behind an async mutex, so
//! turns within one session run one at a time while separate sessions stay
//! independent. Nothing survives a restart, and sessions nobody has touched
//! for the idle timeout are dropped the next time a session is created.

use crate::session::SessionState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

pub type SessionSlot = Arc<Mutex<SessionState>>;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

struct Entry {
    slot: SessionSlot,
    last_seen: Instant,
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Create a freshly seeded session, first dropping expired ones
    pub async fn create(&self) -> (Uuid, SessionSlot) {
        let id = Uuid::new_v4();
        let slot = Arc::new(Mutex::new(SessionState::new()));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // A slot still referenced elsewhere is mid-request
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_seen) < self.idle_timeout
                || Arc::strong_count(&entry.slot) > 1
        });
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, live = sessions.len(), "Expired idle sessions");
        }

        sessions.insert(
            id,
            Entry {
                slot: slot.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(session_id = %id, "Session created");
        (id, slot)
    }

    /// Look up a session and mark it as active
    pub async fn get(&self, id: &Uuid) -> Option<SessionSlot> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.slot.clone())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
