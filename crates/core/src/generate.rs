//! TextGenerator trait — the abstraction over LLM backends.
//!
//! A TextGenerator takes a fully rendered prompt and returns the model text.
//! Prompt assembly stays in the agent crate; backends only transport.

use async_trait::async_trait;

use crate::error::GenerationError;

/// One generation call: the prompt plus sampling parameters.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The fully rendered prompt
    pub prompt: String,

    /// Temperature (0.0 = deterministic, higher = more varied)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.2,
            max_output_tokens: 500,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// The core text generation trait.
///
/// The agent calls `generate()` without knowing which backend is wired in,
/// which is also what makes the agent testable with scripted generators.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// A human-readable name for this backend (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and get the generated text back.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, GenerationError>;
}
