//! `small-ai cache`: show what is stored.

use anyhow::Result;

use small_ai::cache::DiskCacheStorage;
use small_ai::Config;

pub(crate) async fn cmd_cache(config: Config) -> Result<()> {
    let storage = DiskCacheStorage::open_dir(&config.worker.cache_dir());
    let stats = storage.stats().await;
    if stats.is_empty() {
        println!("No caches in {}", storage.path().display());
        return Ok(());
    }
    for region in stats {
        let newest = region
            .newest
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>4} entries {:>10} bytes  newest {}",
            region.name, region.entries, region.bytes, newest
        );
    }
    Ok(())
}
