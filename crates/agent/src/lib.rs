//! The EduMentor agent — intent routing over a small set of study skills.
//!
//! Every incoming message travels the same pipeline:
//!
//! 1. **Classify** the intent: attachment, active quiz, quiz trigger, or a
//!    plain question
//! 2. **Route** to the matching skill: document summary, quiz answer,
//!    quiz start, or a context-grounded answer
//! 3. **Record** whatever the interaction changed against the session
//! 4. **Reply** with a tagged body plus trace metadata
//!
//! The dispatcher holds no study logic of its own; each skill lives in its
//! own module and is testable against scripted backends.

pub mod context;
pub mod dispatcher;
pub mod intent;
pub mod quiz;
pub mod summarize;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ContextAssembler, PromptContext};
pub use dispatcher::EduAgent;
pub use intent::IntentClassifier;
pub use quiz::{AnswerOutcome, QuizFlow};
pub use summarize::{DocumentSummarizer, DocumentSummary, SummaryStyle};
