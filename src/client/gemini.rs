//! Gemini `generateContent` client.
//!
//! The document travels inline (`inline_data`) next to the user instruction;
//! the system instruction goes in its own field. The reply's text parts are
//! concatenated into the Markdown result.

use super::{non_empty, ConversionClient, ConversionRequest};
use crate::config::{ViewerConfig, FALLBACK_API_KEY_ENV};
use crate::error::ConversionError;
use crate::prompts::{SYSTEM_INSTRUCTION, USER_INSTRUCTION};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Conversion client speaking the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: ViewerConfig,
}

impl GeminiClient {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body for one document.
    fn build_request_body(config: &ViewerConfig, request: &ConversionRequest) -> Value {
        let system = config.system_prompt.as_deref().unwrap_or(SYSTEM_INSTRUCTION);
        let user = config.user_prompt.as_deref().unwrap_or(USER_INSTRUCTION);

        let mut generation = json!({ "temperature": config.temperature });
        if let Some(n) = config.max_output_tokens {
            generation["maxOutputTokens"] = json!(n);
        }

        json!({
            "system_instruction": { "parts": [{ "text": system }] },
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": request.mime_type,
                            "data": request.data_base64,
                        }
                    },
                    { "text": user },
                ],
            }],
            "generationConfig": generation,
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: &Value) -> String {
        response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Map a non-success HTTP status to the error taxonomy.
    fn classify_status(status: u16, body: &str, model: &str) -> ConversionError {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        match status {
            404 => ConversionError::UpstreamNotFound {
                model: model.to_string(),
            },
            400 => ConversionError::MalformedRequest { detail },
            401 | 403 => ConversionError::PermissionDenied { detail },
            _ => ConversionError::UnknownError(format!("HTTP {status}: {detail}")),
        }
    }
}

#[async_trait]
impl ConversionClient for GeminiClient {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, ConversionError> {
        let api_key =
            self.config
                .resolve_api_key()
                .ok_or_else(|| ConversionError::CredentialMissing {
                    env_var: format!("{} or {}", self.config.api_key_env, FALLBACK_API_KEY_ENV),
                })?;

        let body = Self::build_request_body(&self.config, request);
        info!(
            "Gemini request: model={} mime={} payload={} bytes",
            self.config.model,
            request.mime_type,
            request.data_base64.len()
        );
        let start = Instant::now();

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConversionError::UnknownError(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini returned HTTP {}", status);
            return Err(Self::classify_status(status, &body, &self.config.model));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ConversionError::UnknownError(format!("invalid response body: {e}")))?;
        let text = Self::extract_text(&json);
        debug!(
            "Gemini response: {} chars in {:?}",
            text.len(),
            start.elapsed()
        );
        non_empty(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConversionRequest {
        ConversionRequest::new("JVBERi0=", "application/pdf")
    }

    #[test]
    fn request_body_structure() {
        let config = ViewerConfig::default();
        let body = GeminiClient::build_request_body(&config, &request());

        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(parts[0]["inline_data"]["data"], "JVBERi0=");
        assert_eq!(parts[1]["text"], USER_INSTRUCTION);

        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.2).abs() < 1e-6, "temperature should be ~0.2, got {temp}");
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn request_body_honours_overrides() {
        let config = ViewerConfig::builder()
            .system_prompt("sys")
            .user_prompt("usr")
            .max_output_tokens(8192)
            .build()
            .unwrap();
        let body = GeminiClient::build_request_body(&config, &request());
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "sys");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "usr");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn url_uses_endpoint_and_model() {
        let config = ViewerConfig::builder()
            .endpoint("http://localhost:8080/v1beta/")
            .model("gemini-2.5-pro")
            .build()
            .unwrap();
        let client = GeminiClient::new(config);
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn extracts_and_joins_text_parts() {
        let resp = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "# Title\n" }, { "text": "body" }] }
            }]
        });
        assert_eq!(GeminiClient::extract_text(&resp), "# Title\nbody");
        assert_eq!(GeminiClient::extract_text(&json!({ "candidates": [] })), "");
    }

    #[test]
    fn classifies_statuses() {
        let body = r#"{"error":{"code":400,"message":"Unsupported MIME type","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiClient::classify_status(400, body, "m"),
            ConversionError::MalformedRequest {
                detail: "Unsupported MIME type".into()
            }
        );
        assert_eq!(
            GeminiClient::classify_status(404, "", "gemini-x"),
            ConversionError::UpstreamNotFound {
                model: "gemini-x".into()
            }
        );
        assert!(matches!(
            GeminiClient::classify_status(403, "denied", "m"),
            ConversionError::PermissionDenied { .. }
        ));
        assert_eq!(
            GeminiClient::classify_status(500, "boom", "m"),
            ConversionError::UnknownError("HTTP 500: boom".into())
        );
    }

    #[tokio::test]
    async fn missing_credential_fails_at_call_time() {
        let config = ViewerConfig::builder()
            .api_key("")
            .api_key_env("DOCUMARK_TEST_NEVER_SET")
            .build()
            .unwrap();
        // The fallback variable may exist on a developer machine.
        if std::env::var(FALLBACK_API_KEY_ENV).is_ok() {
            return;
        }
        let client = GeminiClient::new(config);
        let err = client.convert(&request()).await.unwrap_err();
        assert!(matches!(err, ConversionError::CredentialMissing { .. }));
    }
}
