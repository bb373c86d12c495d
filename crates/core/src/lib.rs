//! # EduMentor Core
//!
//! Domain types, traits, and error definitions for the EduMentor study agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod session;
pub mod quiz;
pub mod intent;
pub mod reply;
pub mod generate;
pub mod search;
pub mod extract;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use session::{Role, Session, SessionId, Turn};
pub use quiz::{QuizQuestion, QuizState, QuizSummary, RecordedAnswer};
pub use intent::{Intent, QuizRequest};
pub use reply::{AnswerFeedback, QuestionView, Reply, ReplyBody, ReplyMeta};
pub use generate::{GenerationRequest, TextGenerator};
pub use search::{SearchHit, SearchProvider};
pub use extract::{Attachment, TextExtractor};
pub use store::SessionStore;
