//! GeminiClient -- concrete classifier and generator backend.
//!
//! Sends requests to the Gemini `generateContent` REST endpoint with
//! the API key in the `x-goog-api-key` header. Implements both of the
//! core's ports: [`SafetyClassifier`] for scam analysis and
//! [`DescriptionGenerator`] for listing copy.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in Debug output.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use unimart_core::advisor::SafetyClassifier;
use unimart_core::assistant::DescriptionGenerator;
use unimart_types::error::GenAiError;
use unimart_types::safety::SafetyVerdict;

use super::config::GeminiConfig;
use super::types::{GeminiGenerationConfig, GeminiRequest, GeminiResponse};

/// Gemini HTTP client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

// GeminiClient intentionally does NOT derive Debug so the key can
// never leak through formatting.

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create reqwest client");

        GeminiClient {
            client,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
        }
    }

    /// The model this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// POST one prompt and return the first candidate's text.
    async fn generate_content(
        &self,
        prompt: String,
        generation_config: Option<GeminiGenerationConfig>,
    ) -> Result<String, GenAiError> {
        let body = GeminiRequest::prompt(prompt, generation_config);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::MalformedResponse(e.to_string()))?;

        parsed
            .text()
            .ok_or_else(|| GenAiError::MalformedResponse("no candidate text".to_string()))
    }
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let fenced = fenced.strip_suffix("```").unwrap_or(fenced);
    // Drop the info string ("json") on the opening fence line.
    match fenced.split_once('\n') {
        Some((_, rest)) => rest.trim(),
        None => fenced.trim(),
    }
}

fn safety_prompt(window: &[String]) -> String {
    let transcript = window.join("\n");
    format!(
        "Analyze the following transcript of a buyer-seller conversation on a \
         student marketplace for potential scams or safety risks.\n\n\
         Transcript:\n{transcript}\n\n\
         Return a JSON object with:\n\
         1. \"isSafe\": boolean (true if safe, false if suspicious)\n\
         2. \"warning\": string (a short warning message for the user if unsafe, \
         or null if safe).\n\n\
         Suspicious things: asking to move to WhatsApp immediately, asking for \
         payment before meeting, aggressive behavior."
    )
}

fn description_prompt(title: &str, category: &str) -> String {
    format!(
        "Write a short, fun, catchy, and persuasive product description for a \
         student selling a used \"{title}\" in the category \"{category}\" on a \
         campus marketplace. Keep it under 50 words. Add emojis."
    )
}

impl SafetyClassifier for GeminiClient {
    async fn classify(&self, window: &[String]) -> Result<SafetyVerdict, GenAiError> {
        let generation_config = GeminiGenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            max_output_tokens: None,
            temperature: None,
        };

        let text = self
            .generate_content(safety_prompt(window), Some(generation_config))
            .await?;

        let verdict: SafetyVerdict = serde_json::from_str(extract_json(&text))
            .map_err(|e| GenAiError::MalformedResponse(e.to_string()))?;
        debug!(is_safe = verdict.is_safe, "Safety verdict received");
        Ok(verdict)
    }
}

impl DescriptionGenerator for GeminiClient {
    async fn generate(&self, title: &str, category: &str) -> Result<String, GenAiError> {
        self.generate_content(description_prompt(title, category), None)
            .await
    }
}
