//! Upstream generation API.
//!
//! The proxy talks to the upstream through [`GenerativeUpstream`] so tests can
//! capture the outbound payload without a network.

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use gemini::GeminiClient;

/// Raw upstream reply: HTTP status plus the parsed JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generation API that accepts a JSON payload under a credential.
///
/// `Err` means the call could not complete (transport failure or a body that
/// is not JSON); non-2xx statuses are returned as `Ok` replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeUpstream: Send + Sync {
    async fn generate_content(&self, api_key: &str, payload: &Value) -> Result<UpstreamReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_success_range() {
        assert!(UpstreamReply::new(200, json!({})).is_success());
        assert!(UpstreamReply::new(204, json!({})).is_success());
        assert!(!UpstreamReply::new(199, json!({})).is_success());
        assert!(!UpstreamReply::new(429, json!({})).is_success());
        assert!(!UpstreamReply::new(500, json!({})).is_success());
    }
}
