//! Axum server hosting the proxy function.

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::proxy::ProxyHandler;

/// Netlify-compatible function path the web app posts to.
pub const FUNCTION_PATH: &str = "/.netlify/functions/gemini-proxy";

/// Shorter alias for non-Netlify deployments.
pub const API_PATH: &str = "/api/gemini-proxy";

/// Largest accepted request body, matching the hosted function's limit.
/// Prompts with inline base64 images routinely exceed 1 MiB.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Shared state for all handlers. Read-only after startup.
pub struct AppState {
    pub proxy: ProxyHandler,
    /// Model reported by the health endpoint.
    pub model: String,
}

impl AppState {
    pub fn new(proxy: ProxyHandler, model: &str) -> Self {
        Self {
            proxy,
            model: model.to_string(),
        }
    }
}

/// Build the axum router.
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let shared_state = Arc::new(state);

    let api = Router::new()
        .route(FUNCTION_PATH, any(super::routes::proxy::gemini_proxy))
        .route(API_PATH, any(super::routes::proxy::gemini_proxy))
        .route("/api/health", get(super::routes::health::get_health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    if let Some(dir) = static_dir {
        api.fallback_service(tower_http::services::ServeDir::new(dir))
    } else {
        api
    }
}

/// Bind and serve until the process exits.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state, config.static_dir.clone());
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Proxy server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
