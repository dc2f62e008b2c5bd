//! In-process cache storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::worker::fetch::FetchResponse;

use super::CacheStorage;

#[derive(Debug, Default)]
struct Regions {
    /// Creation order, for `keys()` and `match_any`.
    order: Vec<String>,
    entries: HashMap<String, HashMap<String, FetchResponse>>,
}

impl Regions {
    fn open(&mut self, region: &str) -> &mut HashMap<String, FetchResponse> {
        if !self.entries.contains_key(region) {
            self.order.push(region.to_string());
        }
        self.entries.entry(region.to_string()).or_default()
    }
}

/// Cache regions held in memory behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    regions: RwLock<Regions>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, region: &str) -> Result<()> {
        self.regions.write().await.open(region);
        Ok(())
    }

    async fn get(&self, region: &str, url: &str) -> Result<Option<FetchResponse>> {
        let regions = self.regions.read().await;
        Ok(regions
            .entries
            .get(region)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    async fn put(&self, region: &str, url: &str, response: FetchResponse) -> Result<()> {
        self.regions
            .write()
            .await
            .open(region)
            .insert(url.to_string(), response);
        Ok(())
    }

    async fn put_all(&self, region: &str, entries: Vec<(String, FetchResponse)>) -> Result<()> {
        let mut regions = self.regions.write().await;
        regions.open(region).extend(entries);
        Ok(())
    }

    async fn delete(&self, region: &str) -> Result<bool> {
        let mut regions = self.regions.write().await;
        regions.order.retain(|name| name != region);
        Ok(regions.entries.remove(region).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.regions.read().await.order.clone())
    }

    async fn len(&self, region: &str) -> Result<Option<usize>> {
        Ok(self
            .regions
            .read()
            .await
            .entries
            .get(region)
            .map(HashMap::len))
    }
}
