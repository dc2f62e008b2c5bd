//! Caller-facing proxy outcomes.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// A finished proxy response: status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ProxyResponse {
    /// `200 {"text": ...}`.
    pub fn text(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "text": text }),
        }
    }
}

/// Every way a proxy call can fail, each with a fixed status and body shape.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON payload.")]
    InvalidJson,

    /// Body exceeded the server's size limit before it could be read.
    #[error("Request payload too large.")]
    PayloadTooLarge,

    #[error("API key required. Please configure your key on the frontend or ensure the server key is set.")]
    MissingApiKey,

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    /// Upstream succeeded but carried no answer text.
    #[error("AI response was empty or malformed.")]
    EmptyResponse,

    /// Transport failure or unparseable upstream body.
    #[error("Internal server error during API proxy.")]
    Internal { details: String },
}

impl ProxyError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingApiKey => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::EmptyResponse | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body returned to the caller.
    pub fn body(&self) -> Value {
        match self {
            Self::Upstream { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            Self::Internal { details } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        Self {
            status: err.status(),
            body: err.body(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_have_error_only_bodies() {
        let cases = [
            (ProxyError::MethodNotAllowed, 405, "Method Not Allowed"),
            (ProxyError::InvalidJson, 400, "Invalid JSON payload."),
            (ProxyError::PayloadTooLarge, 413, "Request payload too large."),
            (
                ProxyError::EmptyResponse,
                500,
                "AI response was empty or malformed.",
            ),
        ];
        for (err, status, message) in cases {
            let resp = ProxyResponse::from(err);
            assert_eq!(resp.status.as_u16(), status);
            assert_eq!(resp.body, json!({ "error": message }));
        }
    }

    #[test]
    fn test_missing_key_is_401() {
        let resp = ProxyResponse::from(ProxyError::MissingApiKey);
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert!(resp.body["error"]
            .as_str()
            .unwrap()
            .starts_with("API key required."));
    }

    #[test]
    fn test_upstream_error_keeps_status_and_details() {
        let details = json!({ "error": { "message": "rate limited" } });
        let resp = ProxyResponse::from(ProxyError::Upstream {
            status: 429,
            message: "rate limited".into(),
            details: details.clone(),
        });
        assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.body["error"], "rate limited");
        assert_eq!(resp.body["details"], details);
    }

    #[test]
    fn test_upstream_error_with_unrepresentable_status() {
        let err = ProxyError::Upstream {
            status: 42,
            message: "odd".into(),
            details: Value::Null,
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_body() {
        let resp = ProxyResponse::from(ProxyError::Internal {
            details: "connection refused".into(),
        });
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.body,
            json!({
                "error": "Internal server error during API proxy.",
                "details": "connection refused"
            })
        );
    }
}
