//! In-memory session store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use drill_core::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::SessionView;

/// A session plus the protocol bookkeeping the HTTP layer needs.
#[derive(Debug)]
pub struct ActiveSession {
    pub session: Session,
    /// Set by answer/skip, cleared by advance.
    pub awaiting_advance: bool,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    /// Store clock value at the last touch; orders eviction.
    touched: u64,
}

impl ActiveSession {
    fn new(session: Session, touched: u64) -> Self {
        let now = Utc::now();
        Self {
            session,
            awaiting_advance: false,
            created_at: now,
            last_active_at: now,
            touched,
        }
    }

    /// Reject a second answer for the same item.
    pub fn ensure_can_answer(&self) -> Result<()> {
        if self.awaiting_advance {
            return Err(ApiError::Conflict(
                "answer already submitted; advance to the next item first".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject advancing without an answer.
    pub fn ensure_can_advance(&self) -> Result<()> {
        if !self.awaiting_advance {
            return Err(ApiError::Conflict(
                "no answer to advance from; submit or skip first".to_string(),
            ));
        }
        Ok(())
    }

    pub fn view(&self, session_id: Uuid) -> SessionView {
        SessionView {
            session_id,
            index: self.session.current_index(),
            item: self.session.current_item().clone(),
            cloze: self.session.cloze().map(|cloze| cloze.render("____")),
            progress: self.session.progress(),
            awaiting_advance: self.awaiting_advance,
            created_at: self.created_at,
        }
    }
}

/// Sessions keyed by id. Holds at most `capacity` sessions; inserting past
/// that drops the one idle the longest.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, ActiveSession>>,
    capacity: usize,
    clock: AtomicU64,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Store a new session and return its id with the initial view.
    pub async fn insert(&self, session: Session) -> (Uuid, SessionView) {
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, active)| active.touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::info!(session_id = %id, "Evicted idle session");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let active = ActiveSession::new(session, self.tick());
        let view = active.view(id);
        sessions.insert(id, active);
        (id, view)
    }

    /// Run `f` against a session without touching it.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&ActiveSession) -> T) -> Result<T> {
        let sessions = self.sessions.read().await;
        let active = sessions.get(&id).ok_or_else(|| not_found(id))?;
        Ok(f(active))
    }

    /// Run `f` against a session and mark it active.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ActiveSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let active = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let result = f(active)?;
        active.last_active_at = Utc::now();
        active.touched = self.tick();
        Ok(result)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session {}", id))
}
