//! The conversion capability: document bytes in, Markdown out.
//!
//! Everything upstream of the model is hidden behind [`ConversionClient`], a
//! single async method. The controller never learns which vendor answered,
//! and tests swap in [`stub::StubClient`] for deterministic results.
//!
//! ```text
//! ConversionRequest { base64, mime } ──▶ ConversionClient ──▶ Markdown
//!                                           ├─ gemini::GeminiClient    (default, REST)
//!                                           ├─ provider::ProviderClient (edgequake-llm)
//!                                           └─ stub::StubClient         (tests)
//! ```
//!
//! Contract for implementations: one attempt, no retry, no client-side
//! timeout, and the full text or an error, never a partial result.

pub mod gemini;
pub mod provider;
pub mod stub;

use crate::config::ViewerConfig;
use crate::error::{ConversionError, DocumarkError};
use async_trait::async_trait;
use std::sync::Arc;

pub use gemini::GeminiClient;
pub use provider::ProviderClient;
pub use stub::StubClient;

/// Payload of one conversion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// File contents, standard base64 with padding.
    pub data_base64: String,
    /// MIME type of the file, e.g. `application/pdf`.
    pub mime_type: String,
}

impl ConversionRequest {
    pub fn new(data_base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data_base64: data_base64.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Turns a document into Markdown.
#[async_trait]
pub trait ConversionClient: Send + Sync {
    /// Convert the document. Fails as a whole; there is no partial output.
    async fn convert(&self, request: &ConversionRequest) -> Result<String, ConversionError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Build the client described by `config`.
///
/// A configured `provider_name` selects an `edgequake-llm` provider;
/// otherwise the built-in Gemini client is used. Missing credentials are
/// not an error here: they surface when a conversion is attempted.
pub fn from_config(config: &ViewerConfig) -> Result<Arc<dyn ConversionClient>, DocumarkError> {
    match config.provider_name {
        Some(ref name) => Ok(Arc::new(ProviderClient::from_name(name, config)?)),
        None => Ok(Arc::new(GeminiClient::new(config.clone()))),
    }
}

/// Treat blank model output as no output.
pub(crate) fn non_empty(text: String) -> Result<String, ConversionError> {
    if text.trim().is_empty() {
        Err(ConversionError::EmptyResult)
    } else {
        Ok(text)
    }
}
