//! The proxy handler.
//!
//! Credential priority: `userApiKey` in the request body → server key from
//! config. The body field is always stripped before forwarding.

use axum::http::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

use crate::providers::gemini::{extract_error_message, extract_text};
use crate::providers::GenerativeUpstream;

use super::error::{ProxyError, ProxyResponse};

/// Body field carrying a caller-supplied credential. Never forwarded upstream.
pub const USER_API_KEY_FIELD: &str = "userApiKey";

/// Stateless request translator between the web app and the upstream API.
pub struct ProxyHandler {
    upstream: Arc<dyn GenerativeUpstream>,
    server_api_key: Option<String>,
}

impl std::fmt::Debug for ProxyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyHandler")
            .field(
                "server_api_key",
                &self.server_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ProxyHandler {
    /// `server_api_key` is the operator fallback, read once at startup.
    pub fn new(upstream: Arc<dyn GenerativeUpstream>, server_api_key: Option<String>) -> Self {
        Self {
            upstream,
            server_api_key: server_api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Whether a server-side fallback credential is configured.
    pub fn has_server_key(&self) -> bool {
        self.server_api_key.is_some()
    }

    /// Handle one inbound call. Every outcome is a response; nothing is retried.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> ProxyResponse {
        match self.forward(method, body).await {
            Ok(text) => ProxyResponse::text(&text),
            Err(err) => err.into(),
        }
    }

    async fn forward(&self, method: &Method, body: &[u8]) -> Result<String, ProxyError> {
        if *method != Method::POST {
            return Err(ProxyError::MethodNotAllowed);
        }

        let mut payload = parse_payload(body)?;
        let user_key = take_user_key(&mut payload);

        let api_key = user_key
            .or_else(|| self.server_api_key.clone())
            .ok_or_else(|| {
                error!("No API key provided by user or found on server");
                ProxyError::MissingApiKey
            })?;

        let payload = Value::Object(payload);
        let reply = self
            .upstream
            .generate_content(&api_key, &payload)
            .await
            .map_err(|e| {
                error!("Gemini proxy execution error: {}", e);
                ProxyError::Internal {
                    details: e.to_string(),
                }
            })?;

        if !reply.is_success() {
            error!(status = reply.status, body = %reply.body, "Gemini API error");
            let message = extract_error_message(&reply.body)
                .map(String::from)
                .unwrap_or_else(|| format!("Gemini API returned status {}", reply.status));
            return Err(ProxyError::Upstream {
                status: reply.status,
                message,
                details: reply.body,
            });
        }

        let text = extract_text(&reply.body).ok_or_else(|| {
            error!(body = %reply.body, "Gemini response had no answer text");
            ProxyError::EmptyResponse
        })?;

        debug!(chars = text.len(), "Gemini proxy call succeeded");
        Ok(text.to_string())
    }
}

/// Parse the inbound body as a JSON object.
fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, ProxyError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Err(ProxyError::InvalidJson),
    }
}

/// Remove the caller credential field, returning it if it is a non-empty string.
fn take_user_key(payload: &mut Map<String, Value>) -> Option<String> {
    match payload.remove(USER_API_KEY_FIELD) {
        Some(Value::String(key)) if !key.is_empty() => Some(key),
        _ => None,
    }
}
