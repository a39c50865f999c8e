//! Request and response DTOs for the Gemini `generateContent` endpoint.
//!
//! Response types are deliberately loose (`default` everywhere the API
//! is known to omit fields): the caller parses defensively and treats
//! anything unexpected as a failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(super) struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
pub(super) struct GeminiPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GeminiRequest {
    /// Single-turn request with one user prompt.
    pub fn prompt(text: String, config: Option<GeminiGenerationConfig>) -> Self {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text }],
            }],
            generation_config: config,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts, if any.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text = candidate
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GeminiCandidate {
    #[serde(default)]
    pub content: GeminiResponseContent,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeminiResponsePart {
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GeminiRequest::prompt(
            "hello".to_string(),
            Some(GeminiGenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                max_output_tokens: None,
                temperature: None,
            }),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());

        let empty: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(empty.text().is_none());
    }
}
