//! Live session registry.
//!
//! One entry per open duplex connection, keyed by a time-ordered UUID.
//! Backed by [`DashMap`] so connection tasks can register, update and
//! deregister concurrently without a global lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Snapshot of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
    /// Messages answered on this session so far.
    pub messages: u64,
    pub last_activity: DateTime<Utc>,
}

/// Concurrent session registry.  Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<DashMap<Uuid, SessionInfo>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id.
    pub fn register(&self) -> Uuid {
        let id = Uuid::now_v7();
        let now = Utc::now();
        self.inner.insert(
            id,
            SessionInfo {
                id,
                connected_at: now,
                messages: 0,
                last_activity: now,
            },
        );
        tracing::info!(session_id = %id, active = self.inner.len(), "session registered");
        id
    }

    /// Remove a session.  Returns its final snapshot if it existed.
    pub fn deregister(&self, id: Uuid) -> Option<SessionInfo> {
        let removed = self.inner.remove(&id).map(|(_, info)| info);
        if let Some(info) = &removed {
            tracing::info!(
                session_id = %id,
                messages = info.messages,
                active = self.inner.len(),
                "session deregistered"
            );
        }
        removed
    }

    /// Count one answered message on `id`.
    pub fn record_message(&self, id: Uuid) -> StoreResult<()> {
        let mut entry = self
            .inner
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound { session_id: id })?;
        entry.messages += 1;
        entry.last_activity = Utc::now();
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> StoreResult<SessionInfo> {
        self.inner
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::SessionNotFound { session_id: id })
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.contains_key(&id)
    }

    /// Number of open sessions.
    pub fn count(&self) -> usize {
        self.inner.len()
    }

    /// All sessions, oldest connection first.
    pub fn snapshot(&self) -> Vec<SessionInfo> {
        let mut all: Vec<SessionInfo> = self.inner.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|s| (s.connected_at, s.id));
        all
    }
}
