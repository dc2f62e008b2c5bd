//! `small-ai serve`.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::warn;

use small_ai::api::{start_server, AppState};
use small_ai::providers::GeminiClient;
use small_ai::proxy::ProxyHandler;
use small_ai::Config;

pub(crate) async fn cmd_serve(config: Config) -> Result<()> {
    let client = GeminiClient::from_config(&config.proxy).context("failed to build Gemini client")?;
    let proxy = ProxyHandler::new(Arc::new(client), config.proxy.api_key.clone());
    if !proxy.has_server_key() {
        warn!("No GEMINI_API_KEY configured; callers must send userApiKey");
    }

    let state = AppState::new(proxy, &config.proxy.model);
    start_server(&config.server, state)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))
}
