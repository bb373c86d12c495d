//! Shared scripted backends for agent tests.

use std::sync::Mutex;

use edumentor_core::error::{ExtractionError, GenerationError, SearchError};
use edumentor_core::extract::{Attachment, TextExtractor};
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use edumentor_core::search::{SearchHit, SearchProvider};

/// A generator that returns scripted results in order.
///
/// Panics when more calls arrive than results were scripted, so a test
/// fails loudly if a handler generates more than expected.
pub struct ScriptedGenerator {
    results: Mutex<Vec<Result<String, GenerationError>>>,
    call_count: Mutex<usize>,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            results: Mutex::new(results),
            call_count: Mutex::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A generator with exactly one successful response.
    pub fn single(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// A generator whose only response is the given error.
    pub fn failing(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The prompt from the most recent call, if any call was made.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let mut count = self.call_count.lock().unwrap();
        let results = self.results.lock().unwrap();

        if *count >= results.len() {
            panic!(
                "ScriptedGenerator: no more results (call #{}, have {})",
                *count + 1,
                results.len()
            );
        }

        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
        let result = results[*count].clone();
        *count += 1;
        result
    }
}

/// A search backend returning fixed hits and counting calls.
pub struct FixedSearch {
    hits: Vec<SearchHit>,
    call_count: Mutex<usize>,
}

impl FixedSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl SearchProvider for FixedSearch {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        *self.call_count.lock().unwrap() += 1;
        let mut hits = self.hits.clone();
        hits.truncate(limit);
        Ok(hits)
    }
}

/// A search backend that is always down.
pub struct DownSearch;

#[async_trait::async_trait]
impl SearchProvider for DownSearch {
    fn name(&self) -> &str {
        "down"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Unavailable("search backend offline".into()))
    }
}

/// An extractor that returns fixed text for any attachment.
pub struct FixedExtractor {
    text: String,
}

impl FixedExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait::async_trait]
impl TextExtractor for FixedExtractor {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn extract_text(&self, _attachment: &Attachment) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// An extractor that always fails with a service error.
pub struct FailingExtractor;

#[async_trait::async_trait]
impl TextExtractor for FailingExtractor {
    fn name(&self) -> &str {
        "failing"
    }

    async fn extract_text(&self, _attachment: &Attachment) -> Result<String, ExtractionError> {
        Err(ExtractionError::Service {
            status_code: 500,
            message: "extractor exploded".into(),
        })
    }
}

/// A well-formed generated quiz payload with the given correct indexes.
pub fn quiz_json(correct: &[usize]) -> String {
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

/// A minimal search hit for context tests.
pub fn sample_hit(title: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        snippet: format!("All about {title}."),
    }
}
