//! Error types for the EduMentor domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all EduMentor operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Quiz errors ---
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    // --- Search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Extraction errors ---
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl GenerationError {
    /// Whether the same request could plausibly succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::ApiError { .. }
                | GenerationError::RateLimited { .. }
                | GenerationError::Network(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Generated quiz did not match the expected format: {0}")]
    GenerationFormat(String),

    #[error("No active quiz for session: {0}")]
    NoActiveQuiz(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search unavailable: {0}")]
    Unavailable(String),

    #[error("Search quota exceeded")]
    QuotaExceeded,
}

#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Extraction service error: {message} (status: {status_code})")]
    Service { status_code: u16, message: String },

    #[error("Document text too short: {chars} chars (minimum {min_chars})")]
    TooLittleText { chars: usize, min_chars: usize },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
