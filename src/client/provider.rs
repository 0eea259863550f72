//! Adapter from any `edgequake-llm` provider to [`ConversionClient`].
//!
//! Lets `--provider openai` (or anthropic, ollama, azure, …) stand in for the
//! Gemini client. The document is attached the same way the provider attaches
//! images; whether a given backend accepts PDF or Word payloads is up to it.
//! Provider errors only come back as text, so they are classified with
//! [`ConversionError::classify_message`].

use super::{non_empty, ConversionClient, ConversionRequest};
use crate::config::ViewerConfig;
use crate::error::{ConversionError, DocumarkError};
use crate::prompts::{SYSTEM_INSTRUCTION, USER_INSTRUCTION};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Conversion client backed by an `edgequake-llm` provider.
pub struct ProviderClient {
    provider: Arc<dyn LLMProvider>,
    label: String,
    config: ViewerConfig,
}

impl ProviderClient {
    /// Wrap an already constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, label: impl Into<String>, config: ViewerConfig) -> Self {
        Self {
            provider,
            label: label.into(),
            config,
        }
    }

    /// Create the named provider with `config.model`.
    ///
    /// The provider reads its own credential variable (`OPENAI_API_KEY`,
    /// `ANTHROPIC_API_KEY`, …).
    pub fn from_name(name: &str, config: &ViewerConfig) -> Result<Self, DocumarkError> {
        let provider = ProviderFactory::create_llm_provider(name, &config.model).map_err(|e| {
            DocumarkError::ProviderNotConfigured {
                provider: name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(provider, name, config.clone()))
    }

    fn build_messages(&self, request: &ConversionRequest) -> Vec<ChatMessage> {
        let system = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(SYSTEM_INSTRUCTION);
        let user = self.config.user_prompt.as_deref().unwrap_or(USER_INSTRUCTION);
        let document = ImageData::new(request.data_base64.clone(), request.mime_type.clone());
        vec![
            ChatMessage::system(system),
            ChatMessage::user_with_images(user, vec![document]),
        ]
    }

}

/// Build `CompletionOptions` from the viewer config.
fn build_options(config: &ViewerConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: config.max_output_tokens,
        ..Default::default()
    }
}

#[async_trait]
impl ConversionClient for ProviderClient {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, ConversionError> {
        let messages = self.build_messages(request);
        let options = build_options(&self.config);
        info!(
            "{} request: model={} mime={}",
            self.label, self.config.model, request.mime_type
        );
        let start = Instant::now();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ConversionError::classify_message(&e.to_string(), &self.config.model))?;

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            self.label,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        non_empty(response.content)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let opts = build_options(&ViewerConfig::default());
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_passes_token_limit() {
        let config = ViewerConfig::builder().max_output_tokens(2048).build().unwrap();
        assert_eq!(build_options(&config).max_tokens, Some(2048));
    }
}
