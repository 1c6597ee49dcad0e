//! Bounded conversation history.
//!
//! A ring of the most recent exchanges, oldest first.  Pushing past the
//! capacity evicts from the front.  The lock is held only for the push or
//! the copy, never across an `.await`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of exchanges retained by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(message: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Shared, bounded history.  Cheap to clone.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    inner: Arc<Mutex<VecDeque<ConversationTurn>>>,
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ConversationHistory {
    /// Create a history holding at most `capacity` exchanges (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an exchange, evicting the oldest when full.
    pub fn push(&self, turn: ConversationTurn) {
        let mut ring = self.lock();
        while ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(turn);
        tracing::trace!(len = ring.len(), "history appended");
    }

    /// Shorthand for pushing a freshly timestamped exchange.
    pub fn record(&self, message: impl Into<String>, response: impl Into<String>) {
        self.push(ConversationTurn::new(message, response));
    }

    /// Copy of the retained exchanges, oldest first.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the ring half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ConversationTurn>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
