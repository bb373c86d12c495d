//! Quiz generation and the answer loop.
//!
//! [`QuizFlow`] owns the lifecycle of a quiz: generate a validated question
//! set, park it in the session store, grade answers one at a time, and clear
//! the slot once the last answer lands. Generated question sets are either
//! accepted whole or rejected whole; a quiz that fails validation never
//! reaches the store.

use std::sync::Arc;

use edumentor_core::error::QuizError;
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use edumentor_core::intent::QuizRequest;
use edumentor_core::quiz::{QuizQuestion, QuizState, QuizSummary};
use edumentor_core::reply::{AnswerFeedback, QuestionView};
use edumentor_core::session::SessionId;
use edumentor_core::store::SessionStore;
use serde::Deserialize;
use tracing::{info, warn};

/// What happened after one graded answer.
#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    /// The quiz continues; here is the next question.
    Next {
        question: QuestionView,
        feedback: AnswerFeedback,
    },

    /// That was the last question; the quiz is over and cleared.
    Complete {
        summary: QuizSummary,
        feedback: AnswerFeedback,
    },
}

/// Generates quizzes and grades answers against the stored state.
pub struct QuizFlow {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
    max_output_tokens: u32,
}

impl QuizFlow {
    pub fn new(store: Arc<dyn SessionStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            store,
            generator,
            temperature: 0.8,
            max_output_tokens: 3000,
        }
    }

    pub fn with_generation_params(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Generate a fresh quiz and store it as the session's active quiz.
    ///
    /// Returns the first question. Any previously stored quiz is replaced.
    pub async fn start(
        &self,
        session_id: &SessionId,
        request: &QuizRequest,
    ) -> Result<QuestionView, QuizError> {
        let prompt = build_generation_prompt(request);
        let raw = self
            .generator
            .generate(
                GenerationRequest::new(prompt)
                    .with_temperature(self.temperature)
                    .with_max_output_tokens(self.max_output_tokens),
            )
            .await?;

        let questions = parse_question_set(&raw, request.count)?;
        let state = QuizState::new(request.topic.clone(), request.level.clone(), questions);

        let Some(first) = state.current_question() else {
            return Err(QuizError::GenerationFormat("quiz has no questions".into()));
        };
        let view = QuestionView::from_question(first, 0, state.total);

        self.store.set_quiz(session_id, Some(state)).await?;
        info!(
            session_id = %session_id,
            topic = %request.topic,
            total = request.count,
            "Quiz started"
        );

        Ok(view)
    }

    /// Grade one answer against the active quiz and advance it.
    pub async fn answer(
        &self,
        session_id: &SessionId,
        chosen: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        let Some(mut state) = self.store.get_quiz(session_id).await else {
            return Err(QuizError::NoActiveQuiz(session_id.to_string()));
        };

        let Some(was_correct) = state.record_answer(chosen) else {
            warn!(session_id = %session_id, "Stored quiz was already complete, clearing it");
            self.store.set_quiz(session_id, None).await?;
            return Err(QuizError::NoActiveQuiz(session_id.to_string()));
        };

        let feedback = AnswerFeedback {
            was_correct,
            explanation: state.last_answered().and_then(|q| q.explanation.clone()),
        };

        if state.is_complete() {
            let summary = QuizSummary::from_state(&state);
            self.store.set_quiz(session_id, None).await?;
            info!(
                session_id = %session_id,
                score = summary.score,
                total = summary.total,
                "Quiz completed"
            );
            Ok(AnswerOutcome::Complete { summary, feedback })
        } else {
            let Some(next) = state.current_question() else {
                return Err(QuizError::NoActiveQuiz(session_id.to_string()));
            };
            let view = QuestionView::from_question(next, state.index, state.total);
            self.store.set_quiz(session_id, Some(state)).await?;
            Ok(AnswerOutcome::Next {
                question: view,
                feedback,
            })
        }
    }

    /// Clear the active quiz without finishing it.
    ///
    /// Returns whether there was a quiz to abandon.
    pub async fn abandon(&self, session_id: &SessionId) -> Result<bool, QuizError> {
        let had_quiz = self.store.get_quiz(session_id).await.is_some();
        if had_quiz {
            self.store.set_quiz(session_id, None).await?;
            info!(session_id = %session_id, "Quiz abandoned");
        }
        Ok(had_quiz)
    }
}

fn build_generation_prompt(request: &QuizRequest) -> String {
    let audience = match &request.level {
        Some(level) => format!(" suitable for class {level} students"),
        None => String::new(),
    };

    format!(
        "You are an expert educational quiz generator. Create {count} multiple-choice \
         questions about \"{topic}\"{audience}.\n\n\
         Requirements:\n\
         1. Questions must be directly related to \"{topic}\" only.\n\
         2. Each question must have exactly 4 options.\n\
         3. Mix easy, medium, and hard questions.\n\
         4. Provide a clear explanation for each correct answer.\n\n\
         Return ONLY a valid JSON object, no markdown, no code fences, no extra text.\n\n\
         Format:\n\
         {{\n\
           \"questions\": [\n\
             {{\n\
               \"question\": \"...\",\n\
               \"options\": [\"...\", \"...\", \"...\", \"...\"],\n\
               \"correct_answer\": 0,\n\
               \"explanation\": \"...\"\n\
             }}\n\
           ]\n\
         }}\n\n\
         \"correct_answer\" is the zero-based index of the correct option.\n\
         Generate exactly {count} questions about: {topic}",
        count = request.count,
        topic = request.topic,
        audience = audience,
    )
}

/// Strip a leading/trailing markdown code fence, if the model added one.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[derive(Debug, Deserialize)]
struct GeneratedSet {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse and validate a generated question set.
///
/// The whole set is rejected on the first defect; there is no partial
/// acceptance or padding of short sets.
fn parse_question_set(raw: &str, expected_count: usize) -> Result<Vec<QuizQuestion>, QuizError> {
    let text = strip_code_fences(raw);

    let set: GeneratedSet = serde_json::from_str(text)
        .map_err(|e| QuizError::GenerationFormat(format!("invalid JSON: {e}")))?;

    if set.questions.len() != expected_count {
        return Err(QuizError::GenerationFormat(format!(
            "expected {expected_count} questions, got {}",
            set.questions.len()
        )));
    }

    let mut questions = Vec::with_capacity(set.questions.len());
    for (i, q) in set.questions.into_iter().enumerate() {
        let number = i + 1;

        if q.question.trim().is_empty() {
            return Err(QuizError::GenerationFormat(format!(
                "question {number} has empty text"
            )));
        }
        if q.options.len() != 4 {
            return Err(QuizError::GenerationFormat(format!(
                "question {number} has {} options, expected 4",
                q.options.len()
            )));
        }
        if q.options.iter().any(|o| o.trim().is_empty()) {
            return Err(QuizError::GenerationFormat(format!(
                "question {number} has an empty option"
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(QuizError::GenerationFormat(format!(
                "question {number} marks option {} as correct, but only {} exist",
                q.correct_answer,
                q.options.len()
            )));
        }

        questions.push(QuizQuestion {
            question: q.question,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
        });
    }

    Ok(questions)
}
