//! SearchProvider trait — web search used to ground answers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A web search backend.
///
/// Search is an enrichment: callers are expected to degrade gracefully
/// when it fails rather than surface the error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A human-readable name for this backend (e.g., "google").
    fn name(&self) -> &str;

    /// Run a query and return up to `limit` hits.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError>;
}
