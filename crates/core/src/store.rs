//! SessionStore trait — durable per-session state.
//!
//! The store is a keyed table of [`Session`] values. Reads are infallible:
//! an unknown id behaves exactly like an empty session, and looking one up
//! never creates an entry. Only mutations can fail.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::quiz::QuizState;
use crate::session::{Role, Session, SessionId};

/// Durable session state, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// A human-readable name for this backend (e.g., "file").
    fn name(&self) -> &str;

    /// The stored session, or an empty one for unknown ids.
    async fn get(&self, session_id: &SessionId) -> Session;

    /// Append one conversation turn to the session.
    async fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        text: &str,
    ) -> std::result::Result<(), StoreError>;

    /// The quiz currently stored for the session, complete or not.
    async fn get_quiz(&self, session_id: &SessionId) -> Option<QuizState>;

    /// Replace the session's quiz slot. `None` clears it.
    async fn set_quiz(
        &self,
        session_id: &SessionId,
        quiz: Option<QuizState>,
    ) -> std::result::Result<(), StoreError>;

    /// Drop all state for the session.
    async fn clear_session(&self, session_id: &SessionId) -> std::result::Result<(), StoreError>;

    /// Number of sessions with stored state.
    async fn count(&self) -> usize;
}
