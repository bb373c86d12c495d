//! Conversation context assembly and prompt rendering.
//!
//! The assembler turns a session plus one incoming question into a single
//! rendered prompt: mentor instructions, the recent conversation window,
//! optional web sources, and the question itself. Search is best-effort
//! enrichment; a failing backend degrades to a prompt without sources.

use std::sync::Arc;

use edumentor_core::search::{SearchHit, SearchProvider};
use edumentor_core::session::{Role, Session, Turn};
use tracing::{debug, warn};

/// Exact (lowercased, punctuation-trimmed) messages treated as greetings.
const GREETINGS: &[&str] = &["hi", "hello", "hey", "hii", "hola"];

/// Replacement question used when the student just says hello.
const GREETING_INSTRUCTION: &str =
    "Greet the user politely, introduce yourself as EduMentor, and ask how you can help with studies.";

/// Substrings that suggest the question needs fresh information from the web.
const SEARCH_CUES: &[&str] = &[
    "latest",
    "current",
    "today",
    "news",
    "recent",
    "right now",
    "this year",
    "who is",
    "when did",
    "price of",
    "weather",
];

/// Everything that goes into one generation prompt.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub history: Vec<Turn>,
    pub hits: Vec<SearchHit>,
    pub question: String,
}

impl PromptContext {
    /// Render the full prompt sent to the generator.
    pub fn render(&self) -> String {
        let mut prompt = String::from(
            "You are EduMentor, an AI study assistant for students.\n\n\
             Rules for every response:\n\
             - Be clear, encouraging, and accurate.\n\
             - Prefer short explanations with concrete examples.\n\
             - Use the recent conversation to resolve follow-up questions.\n\
             - When web sources are listed, ground factual claims in them.\n\
             - End with a one-line summary of the answer.\n\n\
             Recent conversation:\n",
        );

        if self.history.is_empty() {
            prompt.push_str("No previous context.\n");
        } else {
            for turn in &self.history {
                let speaker = match turn.role {
                    Role::User => "Student",
                    Role::Assistant => "Mentor",
                };
                prompt.push_str(speaker);
                prompt.push_str(": ");
                prompt.push_str(&turn.text);
                prompt.push('\n');
            }
        }

        prompt.push_str("\nWeb sources:\n");
        if self.hits.is_empty() {
            prompt.push_str("No sources available.\n");
        } else {
            for hit in &self.hits {
                prompt.push_str(&format!(
                    "- {}: {} (url: {})\n",
                    hit.title, hit.snippet, hit.url
                ));
            }
        }

        prompt.push_str("\nStudent question:\n");
        prompt.push_str(&self.question);
        prompt.push_str("\n\nRespond following all rules above.\n");
        prompt
    }
}

/// Builds a [`PromptContext`] from the session history and, when the
/// question calls for it, a round of web search.
pub struct ContextAssembler {
    search: Option<Arc<dyn SearchProvider>>,
    history_window: usize,
    max_results: usize,
}

impl ContextAssembler {
    pub fn new(history_window: usize, max_results: usize) -> Self {
        Self {
            search: None,
            history_window,
            max_results,
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Whether the message is a bare greeting ("hi", "hello!", ...).
    pub fn is_greeting(text: &str) -> bool {
        let trimmed = text.trim().trim_end_matches(['!', '.', '?']).to_lowercase();
        GREETINGS.contains(&trimmed.as_str())
    }

    /// Search runs when the question carries a freshness cue, or when the
    /// session has no history to answer from. Greetings never search.
    fn wants_search(&self, question: &str, history: &[Turn]) -> bool {
        if self.search.is_none() {
            return false;
        }
        let lower = question.to_lowercase();
        SEARCH_CUES.iter().any(|cue| lower.contains(cue)) || history.is_empty()
    }

    pub async fn assemble(&self, session: &Session, question: &str) -> PromptContext {
        let history = session.recent_turns(self.history_window).to_vec();

        if Self::is_greeting(question) {
            return PromptContext {
                history,
                hits: Vec::new(),
                question: GREETING_INSTRUCTION.to_string(),
            };
        }

        let hits = if self.wants_search(question, &history) {
            self.run_search(question).await
        } else {
            Vec::new()
        };

        PromptContext {
            history,
            hits,
            question: question.to_string(),
        }
    }

    async fn run_search(&self, query: &str) -> Vec<SearchHit> {
        let Some(search) = &self.search else {
            return Vec::new();
        };

        match search.search(query, self.max_results).await {
            Ok(hits) => {
                debug!(count = hits.len(), "Web sources attached to context");
                hits
            }
            Err(error) => {
                warn!(error = %error, "Search failed, continuing without sources");
                Vec::new()
            }
        }
    }
}
