//! In-memory session store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use edumentor_core::error::StoreError;
use edumentor_core::quiz::QuizState;
use edumentor_core::session::{Role, Session, SessionId, Turn};
use edumentor_core::store::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A session store backed by a plain HashMap.
/// Useful for tests and sessions where persistence isn't needed.
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, session_id: &SessionId) -> Session {
        self.sessions
            .read()
            .await
            .get(&session_id.0)
            .cloned()
            .unwrap_or_default()
    }

    async fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        text: &str,
    ) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .entry(session_id.0.clone())
            .or_default()
            .turns
            .push(Turn::new(role, text));
        Ok(())
    }

    async fn get_quiz(&self, session_id: &SessionId) -> Option<QuizState> {
        self.sessions
            .read()
            .await
            .get(&session_id.0)
            .and_then(|s| s.quiz.clone())
    }

    async fn set_quiz(
        &self,
        session_id: &SessionId,
        quiz: Option<QuizState>,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        match quiz {
            Some(state) => {
                sessions.entry(session_id.0.clone()).or_default().quiz = Some(state);
            }
            None => {
                if let Some(session) = sessions.get_mut(&session_id.0) {
                    session.quiz = None;
                }
            }
        }
        Ok(())
    }

    async fn clear_session(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.sessions.write().await.remove(&session_id.0);
        Ok(())
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
