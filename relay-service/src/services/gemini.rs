//! Gemini generateContent client.

use crate::config::GeminiSettings;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;

use super::upstream::{send_json, UpstreamError};

/// Name used in error messages and metric labels.
pub const SERVICE_NAME: &str = "Gemini";

/// JSON pointer to the first generated text part.
const GENERATED_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(client: Client, settings: GeminiSettings) -> Self {
        Self { client, settings }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.api_base_url, self.settings.model
        )
    }

    /// Send a single-turn prompt and return the raw response document.
    pub async fn generate_content(
        &self,
        api_key: &Secret<String>,
        prompt: &str,
    ) -> Result<Value, UpstreamError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %self.settings.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let builder = self
            .client
            .post(self.api_url())
            .query(&[("key", api_key.expose_secret().as_str())])
            .json(&request);

        send_json(SERVICE_NAME, builder).await
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response, or `""` when
/// any link of that path is missing or the leaf is not a string.
pub fn extract_generated_text(response: &Value) -> String {
    response
        .pointer(GENERATED_TEXT_POINTER)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_candidate_text() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "hi there" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second candidate" }] } }
            ]
        });
        assert_eq!(extract_generated_text(&response), "hi there");
    }

    #[test]
    fn missing_links_default_to_empty() {
        let cases = [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            json!({ "candidates": null }),
        ];

        for response in cases {
            assert_eq!(extract_generated_text(&response), "", "case: {response}");
        }
    }

    #[test]
    fn non_string_text_defaults_to_empty() {
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert_eq!(extract_generated_text(&response), "");
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn api_url_targets_configured_model() {
        let client = GeminiClient::new(
            Client::new(),
            GeminiSettings {
                api_base_url: "http://localhost:1234/v1beta".to_string(),
                model: "gemini-test".to_string(),
            },
        );
        assert_eq!(
            client.api_url(),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }
}
