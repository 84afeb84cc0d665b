//! In-memory session store keyed by the session cookie

use schedule_lens_core::Session;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    /// Keys in creation order, oldest first
    order: VecDeque<String>,
}

/// Sessions capped at `max_sessions`; the oldest is dropped first.
///
/// Handlers copy a session out with [`SessionStore::get`], work on it
/// without holding the lock and store it back with [`SessionStore::put`].
/// When two requests on the same key overlap, the later `put` wins whole.
pub struct SessionStore {
    inner: Mutex<Inner>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Copy of a session, or a fresh idle one for unknown keys
    pub async fn get(&self, key: &str) -> Session {
        self.inner
            .lock()
            .await
            .sessions
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn put(&self, key: &str, session: Session) {
        let mut inner = self.inner.lock().await;
        if inner.sessions.insert(key.to_string(), session).is_none() {
            inner.order.push_back(key.to_string());
        }
        while inner.order.len() > self.max_sessions {
            if let Some(oldest) = inner.order.pop_front() {
                debug!("Evicting session {}", oldest);
                inner.sessions.remove(&oldest);
            }
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    #[cfg(test)]
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.lock().await.sessions.contains_key(key)
    }
}
