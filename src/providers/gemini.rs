//! Gemini `generateContent` client.
//!
//! Auth is the API key as a `?key=` query parameter; the model is a path
//! segment. The payload is forwarded as-is; shaping it is the caller's job.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::{Error, Result};

use super::{GenerativeUpstream, UpstreamReply};

/// HTTP client for the Gemini v1beta REST API.
pub struct GeminiClient {
    api_base: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client against `api_base` for `model`.
    pub fn new(api_base: &str, model: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: Self::build_client(timeout)?,
        })
    }

    /// Build from the `[proxy]` config section.
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        Self::new(
            &config.api_base,
            &config.model,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build_client(timeout: Option<Duration>) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))
    }

    /// Model identifier used in the upstream path.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the `generateContent` URL (without the key).
    pub fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl GenerativeUpstream for GeminiClient {
    async fn generate_content(&self, api_key: &str, payload: &Value) -> Result<UpstreamReply> {
        debug!("Gemini request to model {}", self.model);

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.map_err(|e| {
            Error::Provider(format!(
                "Failed to parse Gemini response: {}",
                e.without_url()
            ))
        })?;

        Ok(UpstreamReply::new(status, body))
    }
}

/// Extract the answer text at `candidates[0].content.parts[0].text`.
///
/// Missing, non-string and empty values all count as no answer.
pub fn extract_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.is_empty())
}

/// Extract `error.message` from a Gemini error body.
pub fn extract_error_message(response: &Value) -> Option<&str> {
    response["error"]["message"]
        .as_str()
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_url_format() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta",
            "gemini-2.5-flash-preview-09-2025",
            None,
        )
        .unwrap();
        assert_eq!(
            client.api_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent"
        );
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = GeminiClient::new("http://127.0.0.1:1234/v1beta/", "m", None).unwrap();
        assert_eq!(
            client.api_url(),
            "http://127.0.0.1:1234/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_from_config_uses_model() {
        let cfg = ProxyConfig {
            model: "gemini-2.0-flash".into(),
            timeout_secs: Some(30),
            ..Default::default()
        };
        let client = GeminiClient::from_config(&cfg).unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_debug_does_not_print_client_internals() {
        let client = GeminiClient::new("http://x/v1beta", "m", None).unwrap();
        let dbg = format!("{:?}", client);
        assert!(dbg.contains("GeminiClient"));
        assert!(dbg.contains("http://x/v1beta"));
    }

    #[test]
    fn test_extract_text_normal_response() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello world" }]
                }
            }]
        });
        assert_eq!(extract_text(&response), Some("Hello world"));
    }

    #[test]
    fn test_extract_text_uses_first_part_only() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "first" }, { "text": "second" }]
                }
            }]
        });
        assert_eq!(extract_text(&response), Some("first"));
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert_eq!(extract_text(&json!({ "promptFeedback": {} })), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_extract_text_empty_or_non_string() {
        let empty = json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] });
        assert_eq!(extract_text(&empty), None);
        let number = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert_eq!(extract_text(&number), None);
    }

    #[test]
    fn test_extract_error_message() {
        let body = json!({ "error": { "code": 429, "message": "rate limited" } });
        assert_eq!(extract_error_message(&body), Some("rate limited"));
        assert_eq!(extract_error_message(&json!({ "error": "flat" })), None);
        assert_eq!(extract_error_message(&json!([])), None);
    }
}
