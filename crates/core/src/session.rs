//! Session and conversation turn domain types.
//!
//! These are the core value objects that flow through the system:
//! User sends a message → Agent routes it → Reply comes back, and the
//! exchange is recorded against the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::QuizState;

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student
    User,
    /// The mentor
    Assistant,
}

/// A single recorded turn in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it
    pub role: Role,

    /// The text content
    pub text: String,

    /// When it was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new student turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a new mentor turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// All durable state held for one session: the recorded conversation
/// plus the quiz in progress, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Ordered conversation turns
    #[serde(default)]
    pub turns: Vec<Turn>,

    /// Quiz in progress (absent when no quiz is running)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizState>,
}

impl Session {
    /// The last `n` turns in order, fewer if the session is shorter.
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Whether a quiz is running and still has questions left.
    pub fn has_active_quiz(&self) -> bool {
        self.quiz.as_ref().is_some_and(|q| !q.is_complete())
    }
}
