//! The reply envelope handed back to callers.
//!
//! Every interaction produces exactly one [`Reply`]: a tagged body that says
//! what kind of response this is, plus trace metadata.

use serde::{Deserialize, Serialize};

use crate::quiz::{QuizQuestion, QuizSummary};

/// Trace metadata attached to every reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyMeta {
    /// Correlates all log lines for this interaction
    pub trace_id: String,

    /// Wall-clock seconds spent handling the message
    pub elapsed_s: f64,
}

impl ReplyMeta {
    pub fn new(trace_id: impl Into<String>, elapsed_s: f64) -> Self {
        Self {
            trace_id: trace_id.into(),
            elapsed_s,
        }
    }
}

/// A quiz question as presented to the student.
///
/// Deliberately does not carry the correct option index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    /// One-based position in the quiz
    pub number: usize,

    /// Total questions in the quiz
    pub total: usize,

    /// Question text
    pub question: String,

    /// Answer options, displayed in order
    pub options: Vec<String>,
}

impl QuestionView {
    pub fn from_question(question: &QuizQuestion, index: usize, total: usize) -> Self {
        Self {
            number: index + 1,
            total,
            question: question.question.clone(),
            options: question.options.clone(),
        }
    }
}

/// Grading of the answer the student just gave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub was_correct: bool,

    /// Explanation for the correct option, when the generator provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The payload of a reply, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyBody {
    /// A conversational answer
    Answer { text: String },

    /// The next quiz question to answer. `feedback` grades the previous
    /// answer and is absent on the first question.
    QuizQuestion {
        question: QuestionView,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feedback: Option<AnswerFeedback>,
    },

    /// Final results after the last answer
    QuizSummary {
        summary: QuizSummary,
        feedback: AnswerFeedback,
    },

    /// Summary of an uploaded document
    PdfSummary {
        summary: String,
        original_chars: usize,
    },

    /// The interaction failed in a way worth telling the student about
    Error { message: String, retryable: bool },
}

/// One complete reply: body plus trace metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    #[serde(flatten)]
    pub body: ReplyBody,

    pub meta: ReplyMeta,
}

impl Reply {
    pub fn new(body: ReplyBody, meta: ReplyMeta) -> Self {
        Self { body, meta }
    }

    /// The wire tag of this reply's body.
    pub fn kind(&self) -> &'static str {
        match &self.body {
            ReplyBody::Answer { .. } => "answer",
            ReplyBody::QuizQuestion { .. } => "quiz_question",
            ReplyBody::QuizSummary { .. } => "quiz_summary",
            ReplyBody::PdfSummary { .. } => "pdf_summary",
            ReplyBody::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serializes_with_kind_tag() {
        let reply = Reply::new(
            ReplyBody::Answer {
                text: "Plants convert light into energy.".into(),
            },
            ReplyMeta::new("trace-1", 0.42),
        );

        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains("\"kind\":\"answer\""));
        assert!(json.contains("\"trace_id\":\"trace-1\""));
        assert_eq!(reply.kind(), "answer");
    }

    #[test]
    fn question_view_hides_the_correct_index() {
        let question = QuizQuestion {
            question: "Which gas do plants absorb?".into(),
            options: vec!["O2".into(), "CO2".into(), "N2".into(), "H2".into()],
            correct_answer: 1,
            explanation: Some("Carbon dioxide feeds the Calvin cycle.".into()),
        };

        let view = QuestionView::from_question(&question, 0, 3);
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 3);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("correct_answer"));
        assert!(!json.contains("Calvin"));
    }

    #[test]
    fn first_question_omits_feedback() {
        let question = QuizQuestion {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer: 1,
            explanation: None,
        };
        let body = ReplyBody::QuizQuestion {
            question: QuestionView::from_question(&question, 0, 5),
            feedback: None,
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"kind\":\"quiz_question\""));
        assert!(!json.contains("feedback"));
    }
}
