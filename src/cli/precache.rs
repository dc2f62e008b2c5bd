//! `small-ai precache`: run install + activate against the disk cache.

use anyhow::{Context, Result};
use std::sync::Arc;

use small_ai::cache::DiskCacheStorage;
use small_ai::worker::{AssetCacheWorker, AssetManifest, HttpFetcher};
use small_ai::Config;

pub(crate) async fn cmd_precache(config: Config) -> Result<()> {
    let manifest = AssetManifest::for_origin(&config.worker.origin)?;
    let fetcher = HttpFetcher::new(manifest.origin.clone()).context("failed to build fetcher")?;
    let storage = DiskCacheStorage::open_dir(&config.worker.cache_dir());
    println!("Cache file: {}", storage.path().display());

    let worker = AssetCacheWorker::new(manifest, Arc::new(storage), Arc::new(fetcher));

    let install = worker.on_install().await;
    match &install.failure {
        None => println!("Cached {} assets in {}", install.cached, install.cache_name),
        Some(reason) => println!(
            "Install completed without caching {}: {}",
            install.cache_name, reason
        ),
    }

    let activate = worker.on_activate().await;
    if activate.deleted.is_empty() {
        println!("No old caches to delete");
    } else {
        for name in &activate.deleted {
            println!("Deleted old cache: {}", name);
        }
    }
    Ok(())
}
