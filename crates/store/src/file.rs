//! File-based session store — one JSON document holding the whole table.
//!
//! Storage location: `~/.edumentor/memory.json`
//!
//! Sessions are loaded into memory on creation and the entire table is
//! rewritten to disk on every mutation. This gives fast reads with durable
//! writes, and keeps the on-disk format human-inspectable.

use async_trait::async_trait;
use edumentor_core::error::StoreError;
use edumentor_core::quiz::QuizState;
use edumentor_core::session::{Role, Session, SessionId, Turn};
use edumentor_core::store::SessionStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed session store.
///
/// If the file is unreadable or corrupted, the store starts with an empty
/// table and the old content is overwritten on the next successful write.
pub struct FileStore {
    path: PathBuf,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl FileStore {
    /// Create a new file-based store at the given path.
    ///
    /// If the file exists, sessions are loaded from it.
    /// If the file does not exist, starts empty (file created on first write).
    pub fn new(path: PathBuf) -> Self {
        let sessions = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = sessions.len(), "File session store loaded");
        Self {
            path,
            sessions: Arc::new(RwLock::new(sessions)),
        }
    }

    /// Default path: `~/.edumentor/memory.json`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".edumentor").join("memory.json")
    }

    /// Load the session table from disk.
    fn load_from_disk(path: &PathBuf) -> HashMap<String, Session> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(), // File doesn't exist yet — start empty
        };

        match serde_json::from_str(&content) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Session file corrupted, starting with an empty table"
                );
                HashMap::new()
            }
        }
    }

    /// Rewrite the full table to disk.
    async fn flush(&self) -> Result<(), StoreError> {
        let sessions = self.sessions.read().await;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!("Failed to create session directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(&*sessions).map_err(|e| {
            StoreError::Serialization(format!("Failed to serialize session table: {e}"))
        })?;

        std::fs::write(&self.path, &content)
            .map_err(|e| StoreError::Storage(format!("Failed to write session file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    fn name(&self) -> &str {
        "file"
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
        {
            let mut sessions = self.sessions.write().await;
            sessions
                .entry(session_id.0.clone())
                .or_default()
                .turns
                .push(Turn::new(role, text));
        }
        self.flush().await
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
        {
            let mut sessions = self.sessions.write().await;
            match quiz {
                Some(state) => {
                    sessions.entry(session_id.0.clone()).or_default().quiz = Some(state);
                }
                None => match sessions.get_mut(&session_id.0) {
                    Some(session) => session.quiz = None,
                    // Clearing a quiz that was never set shouldn't create an entry.
                    None => return Ok(()),
                },
            }
        }
        self.flush().await
    }

    async fn clear_session(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let removed = self.sessions.write().await.remove(&session_id.0).is_some();
        if removed {
            self.flush().await?;
        }
        Ok(())
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
