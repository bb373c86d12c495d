//! Document summarization: extract text, bound it, and summarize.

use std::sync::Arc;

use edumentor_core::error::{ExtractionError, Result};
use edumentor_core::extract::{Attachment, TextExtractor};
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use tracing::debug;

/// Appended when the extracted text exceeds the processing limit.
pub const TRUNCATION_MARKER: &str = "\n\n[Document truncated for processing...]";

/// Presentation style for a document summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStyle {
    /// Structured overview with key points and a conclusion.
    #[default]
    General,

    /// Longer section-by-section analysis.
    Detailed,

    /// Compact bullet list.
    Bullet,
}

impl SummaryStyle {
    /// Infer the style from the message accompanying the upload.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("detailed") {
            SummaryStyle::Detailed
        } else if lower.contains("bullet") {
            SummaryStyle::Bullet
        } else {
            SummaryStyle::General
        }
    }

    /// Parse an explicit style name, as typed in a command argument.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "general" => Some(SummaryStyle::General),
            "detailed" => Some(SummaryStyle::Detailed),
            "bullet" | "bullets" => Some(SummaryStyle::Bullet),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SummaryStyle::General => "general",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::Bullet => "bullet",
        }
    }
}

/// A produced summary plus the size of the document it came from.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub summary: String,

    /// Character count of the extracted text before any truncation.
    pub original_chars: usize,
}

/// Extracts text from an attachment and produces a styled summary.
pub struct DocumentSummarizer {
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn TextGenerator>,
    max_chars: usize,
    min_chars: usize,
    temperature: f32,
    max_output_tokens: u32,
}

impl DocumentSummarizer {
    pub fn new(extractor: Arc<dyn TextExtractor>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            extractor,
            generator,
            max_chars: 15_000,
            min_chars: 100,
            temperature: 0.3,
            max_output_tokens: 1500,
        }
    }

    pub fn with_limits(mut self, max_chars: usize, min_chars: usize) -> Self {
        self.max_chars = max_chars;
        self.min_chars = min_chars;
        self
    }

    pub fn with_generation_params(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub async fn summarize(
        &self,
        attachment: &Attachment,
        style: SummaryStyle,
    ) -> Result<DocumentSummary> {
        let text = self.extractor.extract_text(attachment).await?;
        let original_chars = text.chars().count();

        if text.trim().chars().count() < self.min_chars {
            return Err(ExtractionError::TooLittleText {
                chars: original_chars,
                min_chars: self.min_chars,
            }
            .into());
        }

        let bounded = self.bound_text(&text);
        debug!(
            filename = %attachment.filename,
            original_chars,
            style = style.label(),
            "Summarizing document"
        );

        let summary = self
            .generator
            .generate(
                GenerationRequest::new(build_summary_prompt(&bounded, style))
                    .with_temperature(self.temperature)
                    .with_max_output_tokens(self.max_output_tokens),
            )
            .await?;

        Ok(DocumentSummary {
            summary,
            original_chars,
        })
    }

    /// Cap the text at `max_chars` characters, marking the cut.
    ///
    /// Counts characters rather than bytes so multi-byte text is never
    /// split mid-character.
    fn bound_text(&self, text: &str) -> String {
        if text.chars().count() <= self.max_chars {
            return text.to_string();
        }
        let mut bounded: String = text.chars().take(self.max_chars).collect();
        bounded.push_str(TRUNCATION_MARKER);
        bounded
    }
}

fn build_summary_prompt(text: &str, style: SummaryStyle) -> String {
    match style {
        SummaryStyle::General => format!(
            "Summarize the following document in a clear, structured format.\n\n\
             Provide:\n\
             1. Main Topic: what the document is about\n\
             2. Key Points: 5-7 main takeaways\n\
             3. Important Details: notable facts, figures, or concepts\n\
             4. Conclusion: overall summary in 2-3 sentences\n\n\
             Document text:\n{text}"
        ),
        SummaryStyle::Detailed => format!(
            "Provide a detailed analysis of the following document.\n\n\
             Include:\n\
             1. Executive Summary: overview in 3-4 sentences\n\
             2. Main Sections: break down each major section\n\
             3. Key Concepts: important terms and definitions\n\
             4. Data and Statistics: notable numbers, dates, and facts\n\
             5. Conclusions: final takeaways\n\n\
             Document text:\n{text}"
        ),
        SummaryStyle::Bullet => format!(
            "Create a bullet-point summary of the following document.\n\n\
             Provide:\n\
             - The main topic\n\
             - 5-10 key bullet points\n\
             - The most important takeaway\n\n\
             Document text:\n{text}"
        ),
    }
}
