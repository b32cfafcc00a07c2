// src/web/sessions.rs
//! In-memory session registry; each session sits behind its own async mutex.
//! Sessions idle for longer than the TTL are dropped on the next create or get.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::session::Session;

pub type SharedSession = Arc<Mutex<Session>>;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct SessionEntry {
    session: SharedSession,
    last_touched: Instant,
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new()));
        let now = Instant::now();

        let mut sessions = self.write();
        self.evict_idle(&mut sessions, now);
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_touched: now,
            },
        );
        (id, session)
    }

    /// Unknown, expired or malformed ids all yield `None`. A hit counts as activity.
    pub fn get(&self, id: &str) -> Option<SharedSession> {
        let id = Uuid::parse_str(id).ok()?;
        let now = Instant::now();

        let mut sessions = self.write();
        self.evict_idle(&mut sessions, now);
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = now;
        Some(entry.session.clone())
    }

    pub fn remove(&self, id: &str) -> bool {
        match Uuid::parse_str(id) {
            Ok(id) => self.write().remove(&id).is_some(),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_touched) < self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
    }

    // A poisoned map is still structurally sound; keep serving it.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
