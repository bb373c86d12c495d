//! Quiz state machine value objects.
//!
//! A quiz lives inside a [`crate::session::Session`] and moves through three
//! states: no quiz, awaiting an answer, and complete. The state advances on
//! every recorded answer, whether or not the answer was in range.

use serde::{Deserialize, Serialize};

/// One generated multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text
    pub question: String,

    /// Answer options, displayed in order
    pub options: Vec<String>,

    /// Zero-based index of the correct option
    pub correct_answer: usize,

    /// Why the correct option is correct (shown after answering)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One graded answer from the student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedAnswer {
    /// Zero-based option index the student chose
    pub chosen: usize,

    /// Whether it matched the correct option
    pub correct: bool,
}

/// The full state of a quiz in progress, persisted with the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizState {
    /// What the quiz is about
    pub topic: String,

    /// Class or grade level, when the student named one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Number of questions in this quiz
    pub total: usize,

    /// The generated questions
    pub questions: Vec<QuizQuestion>,

    /// Index of the question currently awaiting an answer
    pub index: usize,

    /// Answers recorded so far, one per answered question
    pub answers: Vec<RecordedAnswer>,
}

impl QuizState {
    pub fn new(topic: impl Into<String>, level: Option<String>, questions: Vec<QuizQuestion>) -> Self {
        let total = questions.len();
        Self {
            topic: topic.into(),
            level,
            total,
            questions,
            index: 0,
            answers: Vec::new(),
        }
    }

    /// The question currently awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    /// A quiz is complete when every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.index >= self.total
    }

    /// Grade `chosen` against the current question, record it, and advance.
    ///
    /// An out-of-range `chosen` is recorded as incorrect; the quiz still
    /// advances. Returns `None` when the quiz is already complete.
    pub fn record_answer(&mut self, chosen: usize) -> Option<bool> {
        let question = self.questions.get(self.index)?;
        let correct = chosen == question.correct_answer;
        self.answers.push(RecordedAnswer { chosen, correct });
        self.index += 1;
        Some(correct)
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// The most recently answered question, if any.
    pub fn last_answered(&self) -> Option<&QuizQuestion> {
        self.index.checked_sub(1).and_then(|i| self.questions.get(i))
    }
}

/// Final results of a completed quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub topic: String,
    pub score: usize,
    pub total: usize,

    /// Score as a percentage, rounded to one decimal place
    pub percentage: f64,

    /// Per-question results in quiz order
    pub breakdown: Vec<QuestionResult>,
}

/// One line of the summary breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub chosen: usize,
    pub correct_answer: usize,
    pub correct: bool,
}

impl QuizSummary {
    pub fn from_state(state: &QuizState) -> Self {
        let score = state.score();
        let total = state.total;
        let percentage = if total == 0 {
            0.0
        } else {
            (score as f64 / total as f64 * 1000.0).round() / 10.0
        };

        let breakdown = state
            .questions
            .iter()
            .zip(&state.answers)
            .map(|(q, a)| QuestionResult {
                question: q.question.clone(),
                chosen: a.chosen,
                correct_answer: q.correct_answer,
                correct: a.correct,
            })
            .collect();

        Self {
            topic: state.topic.clone(),
            score,
            total,
            percentage,
            breakdown,
        }
    }
}
