//! TextExtractor trait — pulling plain text out of uploaded documents.

use async_trait::async_trait;

use crate::error::ExtractionError;

/// A document uploaded alongside a message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// A document text extraction backend.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// A human-readable name for this backend (e.g., "tika").
    fn name(&self) -> &str;

    /// Extract the plain text of `attachment`.
    async fn extract_text(
        &self,
        attachment: &Attachment,
    ) -> std::result::Result<String, ExtractionError>;
}
