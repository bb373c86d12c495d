//! Google Custom Search backend.
//!
//! Thin wrapper over the Custom Search JSON API. Quota exhaustion is
//! reported as its own error so callers can log it distinctly, but every
//! failure here is expected to be survivable.

use async_trait::async_trait;
use edumentor_core::error::SearchError;
use edumentor_core::search::{SearchHit, SearchProvider};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// A Google Custom Search client.
pub struct GoogleSearch {
    api_key: String,
    engine_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleSearch {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Point the client at a different endpoint (used against proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        // The API accepts 1..=10 results per request
        let num = limit.clamp(1, 10);

        debug!(query, num, "Sending search request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(SearchError::QuotaExceeded);
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search backend returned error");
            return Err(SearchError::Unavailable(format!(
                "status {status}: {error_body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Unavailable(format!("Failed to parse response: {e}")))?;

        let hits = api_response
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                url: item.link,
                snippet: item.snippet,
            })
            .collect();

        Ok(hits)
    }
}

// --- Custom Search API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}
