//! The EduMentor dispatcher: classify, route, record, reply.
//!
//! [`EduAgent`] is the single entry point for a message. It never returns an
//! error; failures become an error-kind reply so callers always get exactly
//! one reply per message.

use std::sync::Arc;
use std::time::Instant;

use edumentor_config::AppConfig;
use edumentor_core::error::{Error, ExtractionError, QuizError, Result};
use edumentor_core::extract::{Attachment, TextExtractor};
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use edumentor_core::intent::{Intent, QuizRequest};
use edumentor_core::reply::{Reply, ReplyBody, ReplyMeta};
use edumentor_core::search::SearchProvider;
use edumentor_core::session::{Role, SessionId, Turn};
use edumentor_core::store::SessionStore;
use tracing::{error, info};
use uuid::Uuid;

use crate::context::ContextAssembler;
use crate::intent::IntentClassifier;
use crate::quiz::{AnswerOutcome, QuizFlow};
use crate::summarize::{DocumentSummarizer, SummaryStyle};

/// Sentinel index for answers that name no option; always grades incorrect.
const NO_SUCH_OPTION: usize = usize::MAX;

/// The session-aware agent behind every EduMentor conversation.
pub struct EduAgent {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
    classifier: IntentClassifier,
    assembler: ContextAssembler,
    quiz: QuizFlow,
    summarizer: DocumentSummarizer,
    ask_temperature: f32,
    ask_max_output_tokens: u32,
}

impl EduAgent {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn TextGenerator>,
        search: Option<Arc<dyn SearchProvider>>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let classifier = IntentClassifier::new(
            config.quiz.default_count,
            config.quiz.min_count,
            config.quiz.max_count,
        );

        let mut assembler =
            ContextAssembler::new(config.history_window, config.search.max_results);
        if let Some(search) = search {
            assembler = assembler.with_search(search);
        }

        let quiz = QuizFlow::new(store.clone(), generator.clone())
            .with_generation_params(config.quiz.temperature, config.quiz.max_output_tokens);

        let summarizer = DocumentSummarizer::new(extractor, generator.clone())
            .with_limits(config.pdf.max_chars, config.pdf.min_chars)
            .with_generation_params(config.pdf.temperature, config.pdf.max_output_tokens);

        Self {
            store,
            generator,
            classifier,
            assembler,
            quiz,
            summarizer,
            ask_temperature: config.ask.temperature,
            ask_max_output_tokens: config.ask.max_output_tokens,
        }
    }

    /// Handle one message end to end and produce exactly one reply.
    pub async fn handle_message(
        &self,
        session_id: &SessionId,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Reply {
        let trace_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        let quiz_active = self
            .store
            .get_quiz(session_id)
            .await
            .is_some_and(|q| !q.is_complete());

        let intent = self
            .classifier
            .classify(text, attachment.is_some(), quiz_active);
        info!(
            trace_id = %trace_id,
            session_id = %session_id,
            intent = intent.name(),
            "Handling message"
        );

        let result = match &intent {
            Intent::PdfSummary => self.handle_pdf(text, attachment).await,
            Intent::QuizAnswer => self.handle_quiz_answer(session_id, text).await,
            Intent::QuizStart(request) => self.handle_quiz_start(session_id, request).await,
            Intent::Ask => self.handle_ask(session_id, text).await,
        };

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                error!(trace_id = %trace_id, error = %e, "Message handling failed");
                error_body(&e)
            }
        };

        let reply = Reply::new(
            body,
            ReplyMeta::new(trace_id, started.elapsed().as_secs_f64()),
        );
        info!(
            trace_id = %reply.meta.trace_id,
            kind = reply.kind(),
            elapsed_s = reply.meta.elapsed_s,
            "Reply ready"
        );
        reply
    }

    /// The full stored conversation for a session.
    pub async fn history(&self, session_id: &SessionId) -> Vec<Turn> {
        self.store.get(session_id).await.turns
    }

    /// Drop everything stored for the session.
    pub async fn reset(&self, session_id: &SessionId) -> Result<()> {
        self.store.clear_session(session_id).await?;
        Ok(())
    }

    /// Abandon the active quiz, if any. Returns whether one was abandoned.
    pub async fn abandon_quiz(&self, session_id: &SessionId) -> Result<bool> {
        Ok(self.quiz.abandon(session_id).await?)
    }

    async fn handle_ask(&self, session_id: &SessionId, text: &str) -> Result<ReplyBody> {
        let session = self.store.get(session_id).await;
        let context = self.assembler.assemble(&session, text).await;

        let answer = self
            .generator
            .generate(
                GenerationRequest::new(context.render())
                    .with_temperature(self.ask_temperature)
                    .with_max_output_tokens(self.ask_max_output_tokens),
            )
            .await?;

        // Only a successful exchange is recorded.
        self.store.append_turn(session_id, Role::User, text).await?;
        self.store
            .append_turn(session_id, Role::Assistant, &answer)
            .await?;

        Ok(ReplyBody::Answer { text: answer })
    }

    async fn handle_quiz_start(
        &self,
        session_id: &SessionId,
        request: &QuizRequest,
    ) -> Result<ReplyBody> {
        let question = self.quiz.start(session_id, request).await?;
        Ok(ReplyBody::QuizQuestion {
            question,
            feedback: None,
        })
    }

    async fn handle_quiz_answer(&self, session_id: &SessionId, text: &str) -> Result<ReplyBody> {
        let chosen = parse_choice(text);
        match self.quiz.answer(session_id, chosen).await? {
            AnswerOutcome::Next { question, feedback } => Ok(ReplyBody::QuizQuestion {
                question,
                feedback: Some(feedback),
            }),
            AnswerOutcome::Complete { summary, feedback } => {
                Ok(ReplyBody::QuizSummary { summary, feedback })
            }
        }
    }

    async fn handle_pdf(&self, text: &str, attachment: Option<Attachment>) -> Result<ReplyBody> {
        let Some(attachment) = attachment else {
            return Err(Error::Internal(
                "attachment routing without an attachment".into(),
            ));
        };

        let style = SummaryStyle::detect(text);
        let result = self.summarizer.summarize(&attachment, style).await?;

        Ok(ReplyBody::PdfSummary {
            summary: result.summary,
            original_chars: result.original_chars,
        })
    }
}

/// Map an answer message to a zero-based option index.
///
/// Accepts option letters ("a".."d"), one-based numbers ("1".."4"), and
/// either with trailing punctuation ("b)", "2."). Anything else maps past
/// every option list and grades as incorrect.
fn parse_choice(text: &str) -> usize {
    let mut token = text.trim().to_lowercase();
    if let Some(rest) = token.strip_prefix("option ") {
        token = rest.to_string();
    }
    let token = token.trim_end_matches(['.', ')', ':']).trim();

    if token.len() == 1 {
        if let Some(c) = token.chars().next() {
            if c.is_ascii_lowercase() {
                return (c as u8 - b'a') as usize;
            }
        }
    }

    match token.parse::<usize>() {
        Ok(n) => n.checked_sub(1).unwrap_or(NO_SUCH_OPTION),
        Err(_) => NO_SUCH_OPTION,
    }
}

/// Turn a handler error into a student-facing error reply.
fn error_body(error: &Error) -> ReplyBody {
    let (message, retryable) = match error {
        Error::Quiz(QuizError::GenerationFormat(_)) => (
            "I couldn't put together a well-formed quiz this time. Please ask for the quiz again."
                .to_string(),
            true,
        ),
        Error::Quiz(QuizError::NoActiveQuiz(_)) => (
            "There's no quiz running right now. Ask me to quiz you on a topic to start one."
                .to_string(),
            false,
        ),
        Error::Quiz(QuizError::Generation(e)) | Error::Generation(e) => (
            "The tutoring service had a problem answering. Please try again shortly.".to_string(),
            e.is_retryable(),
        ),
        Error::Extraction(ExtractionError::TooLittleText { .. }) => (
            "I couldn't find enough readable text in that document to summarize.".to_string(),
            false,
        ),
        Error::Extraction(_) => (
            "I couldn't read that document. Please check the file and try again.".to_string(),
            true,
        ),
        _ => (
            "Something went wrong handling that message. Please try again.".to_string(),
            true,
        ),
    };

    ReplyBody::Error { message, retryable }
}
