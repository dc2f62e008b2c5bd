//! Proxy function route.
//!
//! Accepts every method; the handler itself answers non-POST with 405.
//! Body read failures (size limit included) still answer with a JSON error.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::api::server::AppState;
use crate::proxy::{ProxyError, ProxyResponse};

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// ANY /.netlify/functions/gemini-proxy, ANY /api/gemini-proxy
pub async fn gemini_proxy(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> ProxyResponse {
    let body = match body {
        Ok(body) => body,
        Err(_) if method != Method::POST => return ProxyError::MethodNotAllowed.into(),
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                "Rejected proxy request body: {}",
                rejection.body_text()
            );
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ProxyError::PayloadTooLarge
            } else {
                ProxyError::InvalidJson
            };
            return err.into();
        }
    };
    state.proxy.handle(&method, &body).await
}
