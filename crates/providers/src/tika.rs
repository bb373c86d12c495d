//! Apache Tika text extraction backend.
//!
//! Sends raw document bytes to a Tika server's `/tika` endpoint and gets
//! plain text back. Tika sniffs the format itself, so this works for PDF
//! and anything else the server understands.

use async_trait::async_trait;
use edumentor_core::error::ExtractionError;
use edumentor_core::extract::{Attachment, TextExtractor};
use tracing::{debug, warn};

/// A Tika server client.
pub struct TikaExtractor {
    base_url: String,
    client: reqwest::Client,
}

impl TikaExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn extract_url(&self) -> String {
        format!("{}/tika", self.base_url)
    }
}

#[async_trait]
impl TextExtractor for TikaExtractor {
    fn name(&self) -> &str {
        "tika"
    }

    async fn extract_text(
        &self,
        attachment: &Attachment,
    ) -> std::result::Result<String, ExtractionError> {
        debug!(
            filename = %attachment.filename,
            bytes = attachment.bytes.len(),
            "Sending extraction request"
        );

        let response = self
            .client
            .put(self.extract_url())
            .header("Accept", "text/plain")
            .body(attachment.bytes.clone())
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Extraction service returned error");
            return Err(ExtractionError::Service {
                status_code: status,
                message: error_body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))
    }
}
