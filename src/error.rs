//! Error types for the documark library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConversionError`]: **Per-attempt**: one conversion failed (missing
//!   credential, upstream rejection, empty model output, unreadable file).
//!   It never escapes as `Err` from the controller; it lands in
//!   [`crate::state::ProcessingState`] and is shown in the result pane.
//!
//! * [`DocumarkError`]: **Operational**: the caller asked for something that
//!   cannot be done at all (bad configuration, unsupported file type, export
//!   write failure). Returned as `Err(DocumarkError)`.
//!
//! Local and remote failures share [`ConversionError`] so the UI presents
//! them identically; only the message text differs.

use crate::config::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a single conversion attempt.
///
/// No variant is retried at any layer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ConversionError {
    /// No API credential was found when the call was attempted.
    #[error("API credential missing: set {env_var} or pass an explicit key")]
    CredentialMissing { env_var: String },

    /// Upstream answered 404: unknown model or endpoint.
    #[error("model '{model}' not found upstream (404)")]
    UpstreamNotFound { model: String },

    /// Upstream answered 400: unsupported file or request too large.
    #[error("upstream rejected the request (400): {detail}")]
    MalformedRequest { detail: String },

    /// Upstream answered 401/403.
    #[error("upstream denied permission (403): {detail}")]
    PermissionDenied { detail: String },

    /// The model returned no text.
    #[error("model returned an empty result")]
    EmptyResult,

    /// The selected file could not be read.
    #[error("failed to read '{path}': {detail}")]
    LocalReadFailure { path: PathBuf, detail: String },

    /// Anything else, including transport failures.
    #[error("conversion failed: {0}")]
    UnknownError(String),
}

impl ConversionError {
    /// Short human-readable message for the result pane.
    ///
    /// The `ZhCn` texts are the ones the viewer has always shown; `En`
    /// mirrors them.
    pub fn user_message(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::CredentialMissing { .. }, Locale::En) => {
                "API key missing. Check your environment configuration.".into()
            }
            (Self::CredentialMissing { .. }, Locale::ZhCn) => {
                "缺少 API 密钥。请检查您的环境配置。".into()
            }
            (Self::UpstreamNotFound { .. }, Locale::En) => {
                "Model not found (404). Check the API key permissions and the model name.".into()
            }
            (Self::UpstreamNotFound { .. }, Locale::ZhCn) => {
                "模型未找到 (404)。请检查 API Key 权限或模型名称是否正确。".into()
            }
            (Self::MalformedRequest { .. }, Locale::En) => {
                "Invalid request (400). The file type may be unsupported or the file too large."
                    .into()
            }
            (Self::MalformedRequest { .. }, Locale::ZhCn) => {
                "请求无效 (400)。可能是文件格式不受支持或文件过大。".into()
            }
            (Self::PermissionDenied { .. }, Locale::En) => {
                "Permission denied (403). Check that the API key is valid.".into()
            }
            (Self::PermissionDenied { .. }, Locale::ZhCn) => {
                "权限被拒绝 (403)。请检查 API Key 是否有效。".into()
            }
            (Self::EmptyResult, Locale::En) => "The model produced no content.".into(),
            (Self::EmptyResult, Locale::ZhCn) => "模型未生成任何内容。".into(),
            (Self::LocalReadFailure { .. }, Locale::En) => "Failed to read the file.".into(),
            (Self::LocalReadFailure { .. }, Locale::ZhCn) => "文件读取失败".into(),
            (Self::UnknownError(detail), _) if !detail.is_empty() => detail.clone(),
            (Self::UnknownError(_), Locale::En) => {
                "An unknown error occurred during conversion.".into()
            }
            (Self::UnknownError(_), Locale::ZhCn) => "转换过程中发生未知错误".into(),
        }
    }

    /// Classify a free-form upstream error message.
    ///
    /// Used when the backend only hands us a string (the `edgequake-llm`
    /// providers); the HTTP client classifies by status code instead.
    pub fn classify_message(message: &str, model: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("404") || lower.contains("not found") {
            Self::UpstreamNotFound {
                model: model.to_string(),
            }
        } else if lower.contains("400") {
            Self::MalformedRequest {
                detail: message.to_string(),
            }
        } else if lower.contains("403") {
            Self::PermissionDenied {
                detail: message.to_string(),
            }
        } else {
            Self::UnknownError(message.to_string())
        }
    }
}

/// All operational errors returned by the documark library.
#[derive(Debug, Error)]
pub enum DocumarkError {
    /// The selected file is neither PDF nor Word.
    #[error("Unsupported file '{path}'\nAccepted: .pdf, .docx, .doc")]
    UnsupportedFormat { path: PathBuf },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured LLM provider could not be created.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Could not create or write an exported file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system clipboard refused the text.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_not_found() {
        let e = ConversionError::classify_message("HTTP 404: models/foo is not found", "foo");
        assert_eq!(
            e,
            ConversionError::UpstreamNotFound {
                model: "foo".into()
            }
        );
    }

    #[test]
    fn classify_bad_request_and_forbidden() {
        assert!(matches!(
            ConversionError::classify_message("status 400 Bad Request", "m"),
            ConversionError::MalformedRequest { .. }
        ));
        assert!(matches!(
            ConversionError::classify_message("status 403 Forbidden", "m"),
            ConversionError::PermissionDenied { .. }
        ));
    }

    #[test]
    fn classify_falls_back_to_unknown() {
        let e = ConversionError::classify_message("connection reset", "m");
        assert_eq!(e, ConversionError::UnknownError("connection reset".into()));
    }

    #[test]
    fn localized_messages_differ() {
        let e = ConversionError::EmptyResult;
        assert_eq!(e.user_message(Locale::ZhCn), "模型未生成任何内容。");
        assert!(e.user_message(Locale::En).contains("no content"));
    }

    #[test]
    fn unknown_error_keeps_upstream_detail() {
        let e = ConversionError::UnknownError("HTTP 500: backend overloaded".into());
        assert_eq!(e.user_message(Locale::En), "HTTP 500: backend overloaded");
        assert_eq!(
            ConversionError::UnknownError(String::new()).user_message(Locale::ZhCn),
            "转换过程中发生未知错误"
        );
    }

    #[test]
    fn unsupported_format_display() {
        let e = DocumarkError::UnsupportedFormat {
            path: "notes.txt".into(),
        };
        assert!(e.to_string().contains("notes.txt"));
        assert!(e.to_string().contains(".docx"));
    }
}
