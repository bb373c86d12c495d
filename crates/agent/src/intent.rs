//! Deterministic intent classification.
//!
//! Routing is rule-based and ordered, so the same message always lands on
//! the same skill:
//!
//! 1. An attachment means the student wants the document summarized
//! 2. With a quiz awaiting an answer, any text is treated as that answer
//! 3. A quiz trigger phrase starts a new quiz
//! 4. Everything else is a regular question

use edumentor_core::intent::{Intent, QuizRequest};
use regex::Regex;
use tracing::debug;

/// Phrases that request a quiz, matched as substrings of the lowercased text.
const QUIZ_TRIGGERS: &[&str] = &[
    "take a test",
    "take test",
    "start a test",
    "start test",
    "quiz me",
    "give me a quiz",
    "test me",
    "give me a test",
    "mcq test",
    "mcq on",
    "multiple choice",
];

/// Topic used when a quiz trigger carries no recognizable topic.
const DEFAULT_TOPIC: &str = "general programming";

/// Classifies messages and extracts quiz parameters from trigger phrases.
///
/// The question count bounds come from configuration; regex patterns are
/// fixed at construction time.
pub struct IntentClassifier {
    topic_re: Regex,
    topic_fallback_re: Regex,
    level_re: Regex,
    count_re: Regex,
    default_count: usize,
    min_count: usize,
    max_count: usize,
}

impl IntentClassifier {
    pub fn new(default_count: usize, min_count: usize, max_count: usize) -> Self {
        Self {
            // Topics usually follow "on" or "about"; "for"/"in" is a weaker
            // signal tried second so "for class 10 ... on trig" picks "trig".
            topic_re: Regex::new(
                r"\b(?:on|about)\s+([a-z][a-z0-9\s'-]*?)(?:\s+for\b|\s+with\b|\s*[?.!,:;]|\s*$)",
            )
            .expect("topic pattern is valid"),
            topic_fallback_re: Regex::new(
                r"\b(?:for|in)\s+([a-z][a-z0-9\s'-]*?)(?:\s+for\b|\s+with\b|\s*[?.!,:;]|\s*$)",
            )
            .expect("topic fallback pattern is valid"),
            level_re: Regex::new(r"(?:for\s+)?(?:class|grade)\s+(\d+)")
                .expect("level pattern is valid"),
            count_re: Regex::new(r"(?:with\s+)?(\d+)\s+questions?")
                .expect("count pattern is valid"),
            default_count,
            min_count,
            max_count,
        }
    }

    /// Classify one incoming message.
    pub fn classify(&self, text: &str, has_attachment: bool, quiz_active: bool) -> Intent {
        if has_attachment {
            return Intent::PdfSummary;
        }
        if quiz_active {
            return Intent::QuizAnswer;
        }
        if self.is_quiz_trigger(text) {
            let request = self.extract_request(text);
            debug!(topic = %request.topic, count = request.count, "Quiz trigger matched");
            return Intent::QuizStart(request);
        }
        Intent::Ask
    }

    fn is_quiz_trigger(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        QUIZ_TRIGGERS.iter().any(|trigger| lower.contains(trigger))
    }

    /// Pull topic, level, and question count out of a trigger message.
    fn extract_request(&self, text: &str) -> QuizRequest {
        let lower = text.to_lowercase();

        let level = self
            .level_re
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let count = self
            .count_re
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .map(|n| n.clamp(self.min_count, self.max_count))
            .unwrap_or(self.default_count);

        // Strip the level and count phrases so they can't bleed into the topic.
        let without_level = self.level_re.replace_all(&lower, " ");
        let stripped = self.count_re.replace_all(&without_level, " ");

        let topic = self
            .topic_re
            .captures(&stripped)
            .or_else(|| self.topic_fallback_re.captures(&stripped))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|topic| !topic.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        QuizRequest {
            topic,
            level,
            count,
        }
    }
}
