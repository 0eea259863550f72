//! Configuration types for document-to-Markdown conversion.
//!
//! All viewer behaviour is controlled through [`ViewerConfig`], built via its
//! [`ViewerConfigBuilder`]. The controller, the conversion clients and the
//! views all read from the same struct, so one value describes a whole run.

use crate::error::DocumarkError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Gemini model, a stable multimodal model that accepts PDF input.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini REST endpoint (without the `/models/...` suffix).
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Primary environment variable holding the API credential.
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Secondary variable consulted when [`DEFAULT_API_KEY_ENV`] is unset.
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for a documark session.
///
/// Built via [`ViewerConfig::builder()`] or using [`ViewerConfig::default()`].
///
/// # Example
/// ```rust
/// use documark::{ViewerConfig, ResponseOrdering};
///
/// let config = ViewerConfig::builder()
///     .model("gemini-2.0-flash")
///     .temperature(0.2)
///     .response_ordering(ResponseOrdering::LatestRequest)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ViewerConfig {
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the Gemini REST API. Default: [`DEFAULT_ENDPOINT`].
    ///
    /// Point this at a proxy or a local mock server when needed.
    pub endpoint: String,

    /// Explicit API key. Takes precedence over the environment.
    pub api_key: Option<String>,

    /// Environment variable read at call time when `api_key` is `None`.
    /// Default: [`DEFAULT_API_KEY_ENV`], falling back to [`FALLBACK_API_KEY_ENV`].
    pub api_key_env: String,

    /// Name of an `edgequake-llm` provider ("openai", "anthropic", "ollama", …).
    ///
    /// When set, conversions go through that provider instead of the
    /// built-in Gemini client.
    pub provider_name: Option<String>,

    /// Sampling temperature. Default: 0.2.
    pub temperature: f32,

    /// Upper bound on generated tokens. `None` leaves it to the backend.
    pub max_output_tokens: Option<usize>,

    /// Custom system instruction. If None, uses [`crate::prompts::SYSTEM_INSTRUCTION`].
    pub system_prompt: Option<String>,

    /// Custom user instruction. If None, uses [`crate::prompts::USER_INSTRUCTION`].
    pub user_prompt: Option<String>,

    /// What to do with a response that arrives after a newer selection.
    pub response_ordering: ResponseOrdering,

    /// How colliding heading ids are handled.
    pub slug_policy: SlugPolicy,

    /// Run [`crate::postprocess::clean_markdown`] over model output. Default: true.
    pub clean_output: bool,

    /// Language of user-facing messages. Default: [`Locale::En`].
    pub locale: Locale,

    /// Progress observer. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            provider_name: None,
            temperature: 0.2,
            max_output_tokens: None,
            system_prompt: None,
            user_prompt: None,
            response_ordering: ResponseOrdering::default(),
            slug_policy: SlugPolicy::default(),
            clean_output: true,
            locale: Locale::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ViewerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("provider_name", &self.provider_name)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("response_ordering", &self.response_ordering)
            .field("slug_policy", &self.slug_policy)
            .field("clean_output", &self.clean_output)
            .field("locale", &self.locale)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ViewerConfig {
    /// Create a new builder for `ViewerConfig`.
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the API credential at call time.
    ///
    /// Order: explicit key, `api_key_env`, then [`FALLBACK_API_KEY_ENV`].
    /// Empty values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|v| !v.is_empty())
    }
}

/// Builder for [`ViewerConfig`].
#[derive(Debug)]
pub struct ViewerConfigBuilder {
    config: ViewerConfig,
}

impl ViewerConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.config.api_key_env = name.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = Some(n);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.user_prompt = Some(prompt.into());
        self
    }

    pub fn response_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.config.response_ordering = ordering;
        self
    }

    pub fn slug_policy(mut self, policy: SlugPolicy) -> Self {
        self.config.slug_policy = policy;
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ViewerConfig, DocumarkError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(DocumarkError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(DocumarkError::InvalidConfig(format!(
                "endpoint must be an HTTP(S) URL, got '{}'",
                c.endpoint
            )));
        }
        if c.max_output_tokens == Some(0) {
            return Err(DocumarkError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Policy for a conversion response that resolves after a newer file was
/// selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseOrdering {
    /// Apply a response only if it belongs to the most recent selection;
    /// older responses are logged and dropped. (default)
    #[default]
    LatestRequest,
    /// Apply every response as it resolves. A slow response for an earlier
    /// file can overwrite the result of a later one.
    LastResolved,
}

/// How headings with identical text are given ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlugPolicy {
    /// Every heading gets the plain slug of its text; duplicates collide and
    /// navigation lands on the first. (default)
    #[default]
    Raw,
    /// Repeated slugs get `-1`, `-2`, … appended in document order.
    Disambiguate,
}

/// Language used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl Locale {
    /// BCP 47 tag for the `lang` attribute of generated pages.
    pub fn html_lang(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhCn => "zh-CN",
        }
    }
}
