//! # parley-store
//!
//! In-memory state shared by every connection of a parley process:
//!
//! - [`history`] -- the bounded ring of recent exchanges served by
//!   `GET /conversation/history`.
//! - [`sessions`] -- the registry of open duplex sessions.
//!
//! Both are `Arc`-backed handles; clone them into whatever needs them.
//! Nothing is persisted.

pub mod error;
pub mod history;
pub mod sessions;

pub use error::{StoreError, StoreResult};
pub use history::{ConversationHistory, ConversationTurn, DEFAULT_HISTORY_CAPACITY};
pub use sessions::{SessionInfo, SessionRegistry};
