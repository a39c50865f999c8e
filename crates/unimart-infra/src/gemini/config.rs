//! Configuration for the Gemini client.

use std::time::Duration;

use secrecy::SecretString;

use unimart_types::error::GenAiError;

/// Default model for both classification and description drafting.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default per-request timeout. Kept short: both call sites fail open,
/// so a slow classifier should give way quickly rather than hold a
/// verdict hostage.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`super::GeminiClient`].
pub struct GeminiConfig {
    /// API key, never logged or included in Debug output.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: SecretString) -> Self {
        GeminiConfig {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, GenAiError> {
        let key = std::env::var("GEMINI_API_KEY").map_err(|_| GenAiError::MissingApiKey)?;
        if key.is_empty() {
            return Err(GenAiError::MissingApiKey);
        }
        Ok(Self::new(SecretString::from(key)))
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
