//! Install / activate / fetch handling.
//!
//! The hosting runtime drives these events; nothing here schedules work. The
//! worker never fails an event outward: errors are logged and turned into a
//! lenient install, a partial purge, or a synthesized response.

use futures::future::join_all;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::cache::CacheStorage;
use crate::error::{Error, Result};

use super::fetch::{FetchRequest, FetchResponse, Fetcher, RequestMode, ResponseKind};
use super::manifest::{cache_key, AssetManifest};
use super::offline;

/// Where the worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

/// Result of the install event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache_name: String,
    /// Assets written to the app-shell region (0 when the batch failed).
    pub cached: usize,
    /// Why the batch was not stored, if it was not.
    pub failure: Option<String>,
    /// Always set: the new version does not wait for old clients to close.
    pub skip_waiting: bool,
}

/// Result of the activate event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
    pub clients_claimed: bool,
}

/// What to do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not ours (non-http scheme); leave it to the browser.
    Passthrough,
    Respond(FetchResponse),
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            Self::Respond(resp) => Some(resp),
            Self::Passthrough => None,
        }
    }
}

/// The asset cache worker over injected storage and network.
pub struct AssetCacheWorker {
    manifest: AssetManifest,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: Mutex<WorkerState>,
}

impl std::fmt::Debug for AssetCacheWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCacheWorker")
            .field("cache_name", &self.manifest.cache_name)
            .field("state", &self.state())
            .finish()
    }
}

impl AssetCacheWorker {
    pub fn new(
        manifest: AssetManifest,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            manifest,
            storage,
            fetcher,
            state: Mutex::new(WorkerState::Parsed),
        }
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: WorkerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Install: pre-cache the app shell as one all-or-nothing batch.
    ///
    /// A failed batch is logged and leaves the region empty; install still
    /// completes and skip-waiting is still signalled.
    pub async fn on_install(&self) -> InstallReport {
        info!("Worker installing");
        self.set_state(WorkerState::Installing);

        let cache_name = self.manifest.cache_name.clone();
        let outcome = self.precache_app_shell().await;
        let (cached, failure) = match outcome {
            Ok(count) => {
                info!(cache = %cache_name, count, "Cached app shell");
                (count, None)
            }
            Err(e) => {
                error!(cache = %cache_name, "Failed to cache during install: {}", e);
                (0, Some(e.to_string()))
            }
        };

        self.set_state(WorkerState::Installed);
        InstallReport {
            cache_name,
            cached,
            failure,
            skip_waiting: true,
        }
    }

    async fn precache_app_shell(&self) -> Result<usize> {
        self.storage.open(&self.manifest.cache_name).await?;

        let urls = self.manifest.asset_urls()?;
        let responses = join_all(urls.iter().map(|url| async move {
            let response = self.fetcher.fetch(&FetchRequest::get(url.clone())).await?;
            if !response.ok() {
                return Err(Error::Provider(format!(
                    "{} returned status {}",
                    url, response.status
                )));
            }
            Ok::<_, Error>((url.clone(), response))
        }))
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let count = responses.len();
        self.storage
            .put_all(&self.manifest.cache_name, responses)
            .await?;
        Ok(count)
    }

    /// Activate: delete every region not named in the manifest, then claim clients.
    pub async fn on_activate(&self) -> ActivateReport {
        info!("Worker activating");
        self.set_state(WorkerState::Activating);

        let keep = self.manifest.current_caches();
        let names = self.storage.keys().await.unwrap_or_else(|e| {
            error!("Failed to list caches: {}", e);
            Vec::new()
        });

        let mut deleted = Vec::new();
        for name in names.into_iter().filter(|n| !keep.contains(&n.as_str())) {
            info!(cache = %name, "Deleting old cache");
            match self.storage.delete(&name).await {
                Ok(_) => deleted.push(name),
                Err(e) => error!(cache = %name, "Failed to delete old cache: {}", e),
            }
        }

        self.set_state(WorkerState::Activated);
        info!(deleted = deleted.len(), "Worker activated");
        ActivateReport {
            deleted,
            clients_claimed: true,
        }
    }

    /// Fetch: route one intercepted request.
    pub async fn on_fetch(&self, request: &FetchRequest) -> FetchOutcome {
        let url = match Url::parse(&request.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return FetchOutcome::Passthrough,
        };

        if url.host_str() == Some(self.manifest.api_host.as_str()) {
            return FetchOutcome::Respond(self.network_only(request).await);
        }

        FetchOutcome::Respond(self.cache_first(request, cache_key(url)).await)
    }

    async fn network_only(&self, request: &FetchRequest) -> FetchResponse {
        match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("AI API fetch failed: {}", e);
                offline::ai_unavailable()
            }
        }
    }

    async fn cache_first(&self, request: &FetchRequest, key: String) -> FetchResponse {
        match self.storage.match_any(&key).await {
            Ok(Some(cached)) => {
                debug!(url = %key, "Cache hit");
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!(url = %key, "Cache lookup failed, going to network: {}", e),
        }

        let response = match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(_) => {
                info!(url = %request.url, "Fetch failed, serving offline fallback");
                return if request.mode == RequestMode::Navigate {
                    offline::offline_page()
                } else {
                    offline::offline_text()
                };
            }
        };

        if response.status == 200 && response.kind == ResponseKind::Basic && request.is_get() {
            if let Err(e) = self
                .storage
                .put(&self.manifest.cache_name, &key, response.clone())
                .await
            {
                warn!(url = %key, "Failed to cache response: {}", e);
            }
        }

        response
    }
}
