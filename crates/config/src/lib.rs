//! Configuration loading, validation, and management for EduMentor.
//!
//! Loads configuration from `~/.edumentor/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.edumentor/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for every generation call
    #[serde(default = "default_model")]
    pub model: String,

    /// Where session state is persisted (defaults to ~/.edumentor/memory.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_file: Option<PathBuf>,

    /// How many recent turns feed into the prompt context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Conversational answer settings
    #[serde(default)]
    pub ask: AskConfig,

    /// Quiz generation settings
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Document summarization settings
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Document text extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_history_window() -> usize {
    5
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("memory_file", &self.memory_file)
            .field("history_window", &self.history_window)
            .field("ask", &self.ask)
            .field("quiz", &self.quiz)
            .field("pdf", &self.pdf)
            .field("search", &self.search)
            .field("extractor", &self.extractor)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskConfig {
    #[serde(default = "default_ask_temperature")]
    pub temperature: f32,

    #[serde(default = "default_ask_max_tokens")]
    pub max_output_tokens: u32,
}

fn default_ask_temperature() -> f32 {
    0.2
}
fn default_ask_max_tokens() -> u32 {
    500
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            temperature: default_ask_temperature(),
            max_output_tokens: default_ask_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_quiz_temperature")]
    pub temperature: f32,

    #[serde(default = "default_quiz_max_tokens")]
    pub max_output_tokens: u32,

    /// Question count used when the request doesn't name one
    #[serde(default = "default_quiz_count")]
    pub default_count: usize,

    /// Requested counts are clamped into [min_count, max_count]
    #[serde(default = "default_quiz_min_count")]
    pub min_count: usize,

    #[serde(default = "default_quiz_max_count")]
    pub max_count: usize,
}

fn default_quiz_temperature() -> f32 {
    0.8
}
fn default_quiz_max_tokens() -> u32 {
    3000
}
fn default_quiz_count() -> usize {
    5
}
fn default_quiz_min_count() -> usize {
    3
}
fn default_quiz_max_count() -> usize {
    10
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            temperature: default_quiz_temperature(),
            max_output_tokens: default_quiz_max_tokens(),
            default_count: default_quiz_count(),
            min_count: default_quiz_min_count(),
            max_count: default_quiz_max_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default = "default_pdf_temperature")]
    pub temperature: f32,

    #[serde(default = "default_pdf_max_tokens")]
    pub max_output_tokens: u32,

    /// Extracted text is truncated to this many characters before prompting
    #[serde(default = "default_pdf_max_chars")]
    pub max_chars: usize,

    /// Documents yielding less text than this are rejected
    #[serde(default = "default_pdf_min_chars")]
    pub min_chars: usize,
}

fn default_pdf_temperature() -> f32 {
    0.3
}
fn default_pdf_max_tokens() -> u32 {
    1500
}
fn default_pdf_max_chars() -> usize {
    15000
}
fn default_pdf_min_chars() -> usize {
    100
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            temperature: default_pdf_temperature(),
            max_output_tokens: default_pdf_max_tokens(),
            max_chars: default_pdf_max_chars(),
            min_chars: default_pdf_min_chars(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Google Custom Search API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Google Custom Search engine id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,

    /// Hits requested per query
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

fn default_search_max_results() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            max_results: default_search_max_results(),
        }
    }
}

impl SearchConfig {
    /// Both credentials, when search is fully configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.api_key, &self.engine_id) {
            (Some(key), Some(id)) => Some((key.clone(), id.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("engine_id", &self.engine_id)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Base URL of the Tika server
    #[serde(default = "default_extractor_url")]
    pub url: String,
}

fn default_extractor_url() -> String {
    "http://localhost:9998".into()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            url: default_extractor_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.edumentor/config.toml).
    ///
    /// Also checks environment variables:
    /// - `GEMINI_API_KEY` / `GOOGLE_API_KEY` for the generation key
    /// - `EDUMENTOR_MODEL` to override the model
    /// - `EDUMENTOR_MEMORY_FILE` to relocate session storage
    /// - `GOOGLE_SEARCH_API_KEY` / `GOOGLE_SEARCH_ENGINE_ID` for search
    /// - `TIKA_URL` for the extraction service
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = Self::config_dir();
        let config_path = config_dir.join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("EDUMENTOR_MODEL") {
            config.model = model;
        }

        if let Ok(path) = std::env::var("EDUMENTOR_MEMORY_FILE") {
            config.memory_file = Some(PathBuf::from(path));
        }

        if config.search.api_key.is_none() {
            config.search.api_key = std::env::var("GOOGLE_SEARCH_API_KEY").ok();
        }
        if config.search.engine_id.is_none() {
            config.search.engine_id = std::env::var("GOOGLE_SEARCH_ENGINE_ID").ok();
        }

        if let Ok(url) = std::env::var("TIKA_URL") {
            config.extractor.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".edumentor")
    }

    /// Where session state lives on disk.
    pub fn memory_path(&self) -> PathBuf {
        self.memory_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("memory.json"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, temperature) in [
            ("ask", self.ask.temperature),
            ("quiz", self.quiz.temperature),
            ("pdf", self.pdf.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "{name}.temperature must be between 0.0 and 2.0"
                )));
            }
        }

        if self.quiz.min_count == 0 {
            return Err(ConfigError::ValidationError(
                "quiz.min_count must be at least 1".into(),
            ));
        }

        if self.quiz.min_count > self.quiz.max_count
            || self.quiz.default_count < self.quiz.min_count
            || self.quiz.default_count > self.quiz.max_count
        {
            return Err(ConfigError::ValidationError(
                "quiz counts must satisfy min_count <= default_count <= max_count".into(),
            ));
        }

        if self.pdf.max_chars <= self.pdf.min_chars {
            return Err(ConfigError::ValidationError(
                "pdf.max_chars must be greater than pdf.min_chars".into(),
            ));
        }

        if self.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "history_window must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if a generation API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            memory_file: None,
            history_window: default_history_window(),
            ask: AskConfig::default(),
            quiz: QuizConfig::default(),
            pdf: PdfConfig::default(),
            search: SearchConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
