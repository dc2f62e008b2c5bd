//! Health endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;

/// GET /api/health — liveness plus the configured model.
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.model,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockGenerativeUpstream;
    use crate::proxy::ProxyHandler;

    #[tokio::test]
    async fn test_get_health_returns_ok() {
        let proxy = ProxyHandler::new(
            Arc::new(MockGenerativeUpstream::new()),
            Some("server-key".into()),
        );
        let state = Arc::new(AppState::new(proxy, "gemini-test"));
        let Json(body) = get_health(State(state)).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
        assert_eq!(body["model"], "gemini-test");
        // Whether an operator credential exists is not advertised.
        assert_eq!(body.as_object().unwrap().len(), 3);
        assert!(body.get("server_key").is_none());
    }
}
