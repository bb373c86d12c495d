//! End-to-end tests for the EduMentor agent pipeline.
//!
//! These exercise the full path from an incoming message to a reply:
//! intent classification, context assembly, the quiz lifecycle, document
//! summaries, and session persistence.

use std::sync::{Arc, Mutex};

use edumentor_agent::EduAgent;
use edumentor_config::AppConfig;
use edumentor_core::error::{ExtractionError, GenerationError, SearchError};
use edumentor_core::extract::{Attachment, TextExtractor};
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use edumentor_core::reply::ReplyBody;
use edumentor_core::search::{SearchHit, SearchProvider};
use edumentor_core::session::{Role, SessionId};
use edumentor_core::store::SessionStore;
use edumentor_store::{FileStore, MemoryStore};

// ── Mock backends ────────────────────────────────────────────────────────

/// A generator that returns scripted results in sequence and records
/// every prompt it was sent.
struct ScriptedModel {
    responses: Mutex<Vec<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
}

impl ScriptedModel {
    fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedModel {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if *count >= responses.len() {
            panic!(
                "ScriptedModel exhausted: call #{}, have {}",
                *count + 1,
                responses.len()
            );
        }
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let response = responses[*count].clone();
        *count += 1;
        response
    }
}

/// A generator that always answers with the same text. Safe under
/// concurrent calls.
struct StaticModel {
    text: String,
}

impl StaticModel {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for StaticModel {
    fn name(&self) -> &str {
        "e2e_static"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.text.clone())
    }
}

struct StaticSearch {
    hits: Vec<SearchHit>,
}

#[async_trait::async_trait]
impl SearchProvider for StaticSearch {
    fn name(&self) -> &str {
        "e2e_search"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let mut hits = self.hits.clone();
        hits.truncate(limit);
        Ok(hits)
    }
}

struct OfflineSearch;

#[async_trait::async_trait]
impl SearchProvider for OfflineSearch {
    fn name(&self) -> &str {
        "e2e_offline_search"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Unavailable("connection refused".into()))
    }
}

struct StaticExtractor {
    text: String,
}

#[async_trait::async_trait]
impl TextExtractor for StaticExtractor {
    fn name(&self) -> &str {
        "e2e_extractor"
    }

    async fn extract_text(&self, _attachment: &Attachment) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn quiz_payload(correct: &[usize]) -> String {
    let questions: Vec<String> = correct
        .iter()
        .enumerate()
        .map(|(i, &answer)| {
            let n = i + 1;
            format!(
                r#"{{"question": "Question {n}?", "options": ["Option A", "Option B", "Option C", "Option D"], "correct_answer": {answer}, "explanation": "Explanation {n}."}}"#
            )
        })
        .collect();
    format!(r#"{{"questions": [{}]}}"#, questions.join(", "))
}

fn extractor_text() -> String {
    "This document covers the water cycle in detail. ".repeat(10)
}

fn build_agent(
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn SearchProvider>>,
) -> EduAgent {
    EduAgent::new(
        &AppConfig::default(),
        store,
        generator,
        search,
        Arc::new(StaticExtractor {
            text: extractor_text(),
        }),
    )
}

// ── E2E: conversational flow ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_ask_then_followup_carries_context() {
    // Scenario: one question, one follow-up. The second prompt must carry
    // the first exchange so the model can resolve "it".
    let model = Arc::new(ScriptedModel::new(vec![
        Ok("Photosynthesis converts light into chemical energy.".to_string()),
        Ok("It happens mostly in the leaves.".to_string()),
    ]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model.clone(), None);
    let session = SessionId::from("ctx");

    let first = agent
        .handle_message(&session, "what is photosynthesis?", None)
        .await;
    assert_eq!(first.kind(), "answer");

    let second = agent
        .handle_message(&session, "where does it happen?", None)
        .await;
    assert_eq!(second.kind(), "answer");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Student: what is photosynthesis?"));
    assert!(prompts[1].contains("Mentor: Photosynthesis converts light into chemical energy."));

    let turns = store.get(&session).await.turns;
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[3].role, Role::Assistant);
}

#[tokio::test]
async fn e2e_greeting_gets_the_introduction_prompt() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(
        "Hello! I'm EduMentor.".to_string()
    )]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model.clone(), None);
    let session = SessionId::from("greet");

    let reply = agent.handle_message(&session, "hi", None).await;

    assert_eq!(reply.kind(), "answer");
    let prompts = model.prompts();
    assert!(prompts[0].contains("introduce yourself as EduMentor"));

    // The raw greeting is recorded, not the rewritten instruction.
    let turns = store.get(&session).await.turns;
    assert_eq!(turns[0].text, "hi");
}

#[tokio::test]
async fn e2e_search_results_reach_the_prompt() {
    let model = Arc::new(ScriptedModel::new(vec![Ok("Grounded answer.".to_string())]));
    let search = Arc::new(StaticSearch {
        hits: vec![SearchHit {
            title: "ISS tracker".to_string(),
            url: "https://example.com/iss".to_string(),
            snippet: "Live station position".to_string(),
        }],
    });
    let agent = build_agent(Arc::new(MemoryStore::new()), model.clone(), Some(search));

    let reply = agent
        .handle_message(
            &SessionId::from("search"),
            "where is the iss right now?",
            None,
        )
        .await;

    assert_eq!(reply.kind(), "answer");
    assert!(model.prompts()[0].contains("ISS tracker"));
}

#[tokio::test]
async fn e2e_search_outage_still_answers() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(
        "An answer without sources.".to_string()
    )]));
    let agent = build_agent(
        Arc::new(MemoryStore::new()),
        model.clone(),
        Some(Arc::new(OfflineSearch)),
    );

    let reply = agent
        .handle_message(&SessionId::from("outage"), "latest exam dates?", None)
        .await;

    assert_eq!(reply.kind(), "answer");
    assert!(model.prompts()[0].contains("No sources available."));
}

#[tokio::test]
async fn e2e_rate_limited_ask_is_a_retryable_error() {
    let model = Arc::new(ScriptedModel::new(vec![Err(
        GenerationError::RateLimited { retry_after_secs: 5 },
    )]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model, None);
    let session = SessionId::from("limited");

    let reply = agent.handle_message(&session, "what is calculus?", None).await;

    match reply.body {
        ReplyBody::Error { retryable, .. } => assert!(retryable),
        other => panic!("expected error reply, got {other:?}"),
    }
    // Nothing was recorded for the failed exchange.
    assert!(store.get(&session).await.turns.is_empty());
}

// ── E2E: quiz lifecycle ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_full_quiz_protocol() {
    // Scenario: request a quiz, answer all three questions (two right,
    // one wrong), confirm the summary, and confirm the session leaves
    // quiz mode.
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(quiz_payload(&[1, 0, 2])),
        Ok("Back to regular questions.".to_string()),
    ]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model.clone(), None);
    let session = SessionId::from("quiz");

    // Start: the trigger carries topic, level, and count.
    let reply = agent
        .handle_message(
            &session,
            "quiz me on photosynthesis for class 10 with 3 questions",
            None,
        )
        .await;
    match reply.body {
        ReplyBody::QuizQuestion { question, feedback } => {
            assert_eq!(question.number, 1);
            assert_eq!(question.total, 3);
            assert_eq!(question.options.len(), 4);
            assert!(feedback.is_none());
        }
        other => panic!("expected first question, got {other:?}"),
    }
    let prompts = model.prompts();
    assert!(prompts[0].contains("3 multiple-choice"));
    assert!(prompts[0].contains("photosynthesis"));
    assert!(prompts[0].contains("class 10"));

    // Q1: "b" names index 1, which is correct.
    let reply = agent.handle_message(&session, "b", None).await;
    match reply.body {
        ReplyBody::QuizQuestion { question, feedback } => {
            assert_eq!(question.number, 2);
            let feedback = feedback.expect("graded feedback");
            assert!(feedback.was_correct);
            assert_eq!(feedback.explanation.as_deref(), Some("Explanation 1."));
        }
        other => panic!("expected second question, got {other:?}"),
    }

    // Q2: "3" names index 2; correct is 0.
    let reply = agent.handle_message(&session, "3", None).await;
    match reply.body {
        ReplyBody::QuizQuestion { question, feedback } => {
            assert_eq!(question.number, 3);
            assert!(!feedback.expect("graded feedback").was_correct);
        }
        other => panic!("expected third question, got {other:?}"),
    }

    // Q3: "c" names index 2, which is correct. Quiz completes at 2/3.
    let reply = agent.handle_message(&session, "c", None).await;
    match reply.body {
        ReplyBody::QuizSummary { summary, feedback } => {
            assert!(feedback.was_correct);
            assert_eq!(summary.score, 2);
            assert_eq!(summary.total, 3);
            assert_eq!(summary.percentage, 66.7);
            assert_eq!(summary.breakdown.len(), 3);
        }
        other => panic!("expected summary, got {other:?}"),
    }

    // The quiz slot is clear; the next message is answered conversationally.
    assert!(store.get_quiz(&session).await.is_none());
    let reply = agent.handle_message(&session, "how did I do?", None).await;
    assert_eq!(reply.kind(), "answer");
}

#[tokio::test]
async fn e2e_malformed_quiz_leaves_session_clean() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(
        "Sorry, I can't produce JSON today.".to_string(),
    )]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model, None);
    let session = SessionId::from("broken-quiz");

    let reply = agent
        .handle_message(&session, "quiz me on chemistry", None)
        .await;

    match reply.body {
        ReplyBody::Error { retryable, .. } => assert!(retryable),
        other => panic!("expected error reply, got {other:?}"),
    }
    assert!(store.get_quiz(&session).await.is_none());
    assert!(store.get(&session).await.turns.is_empty());
}

#[tokio::test]
async fn e2e_attachment_during_quiz_does_not_abandon_it() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(quiz_payload(&[0, 1, 2])),
        Ok("A summary of the water cycle document.".to_string()),
    ]));
    let store = Arc::new(MemoryStore::new());
    let agent = build_agent(store.clone(), model, None);
    let session = SessionId::from("quiz-with-upload");

    agent
        .handle_message(&session, "quiz me on biology with 3 questions", None)
        .await;

    let reply = agent
        .handle_message(
            &session,
            "summarize this please",
            Some(Attachment::new("water-cycle.pdf", vec![0u8; 32])),
        )
        .await;

    match reply.body {
        ReplyBody::PdfSummary { original_chars, .. } => {
            assert_eq!(original_chars, extractor_text().chars().count());
        }
        other => panic!("expected pdf summary, got {other:?}"),
    }

    // The quiz is still waiting on question 1.
    let quiz = store.get_quiz(&session).await.expect("quiz still stored");
    assert_eq!(quiz.index, 0);
}

// ── E2E: sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_concurrent_sessions_stay_isolated() {
    let store = Arc::new(MemoryStore::new());
    let agent = Arc::new(build_agent(
        store.clone(),
        Arc::new(StaticModel::new("The same answer for everyone.")),
        None,
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let agent = agent.clone();
            async move {
                let session = SessionId::from(&format!("student-{i}"));
                agent
                    .handle_message(&session, &format!("question from student {i}"), None)
                    .await
            }
        })
        .collect();
    let replies = futures::future::join_all(handles).await;

    for reply in &replies {
        assert_eq!(reply.kind(), "answer");
    }
    assert_eq!(store.count().await, 8);
    for i in 0..8 {
        let turns = store.get(&SessionId::from(&format!("student-{i}"))).await.turns;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, format!("question from student {i}"));
    }
}

#[tokio::test]
async fn e2e_quiz_survives_process_restart() {
    // Scenario: a quiz starts under one store instance, the "process"
    // restarts, and a fresh store instance picks the quiz up mid-way.
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("memory.json");
    let session = SessionId::from("persistent");

    {
        let model = Arc::new(ScriptedModel::new(vec![Ok(quiz_payload(&[1, 0, 2]))]));
        let store = Arc::new(FileStore::new(path.clone()));
        let agent = build_agent(store, model, None);
        agent
            .handle_message(&session, "quiz me on fractions with 3 questions", None)
            .await;
    }

    // Fresh store, fresh agent, same file.
    let model = Arc::new(ScriptedModel::new(vec![]));
    let store = Arc::new(FileStore::new(path));
    let agent = build_agent(store.clone(), model, None);

    let reply = agent.handle_message(&session, "b", None).await;
    match reply.body {
        ReplyBody::QuizQuestion { question, feedback } => {
            assert_eq!(question.number, 2);
            assert!(feedback.expect("graded feedback").was_correct);
        }
        other => panic!("expected question 2 after restart, got {other:?}"),
    }
}
