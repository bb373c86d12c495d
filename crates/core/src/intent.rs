//! Classified intent of an incoming message.
//!
//! Classification itself lives in the agent crate; these are the outcomes
//! it routes on.

/// Parameters for a requested quiz, extracted from the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    /// Subject of the quiz
    pub topic: String,

    /// Class or grade level, if the student named one
    pub level: Option<String>,

    /// Number of questions to generate
    pub count: usize,
}

/// What the student is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A regular question, answered with conversation context
    Ask,

    /// Start a new quiz with the given parameters
    QuizStart(QuizRequest),

    /// An answer to the question the active quiz is waiting on
    QuizAnswer,

    /// Summarize the attached document
    PdfSummary,
}

impl Intent {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Ask => "ask",
            Intent::QuizStart(_) => "quiz_start",
            Intent::QuizAnswer => "quiz_answer",
            Intent::PdfSummary => "pdf_summary",
        }
    }
}
