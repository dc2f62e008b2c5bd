//! JSON-file cache storage.
//!
//! Persists every region to `<dir>/caches.json`. Bodies are base64 in the file;
//! each entry records when it was stored. The whole file is rewritten after
//! each mutation, which is fine for an app shell of a dozen assets.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::worker::fetch::FetchResponse;

use super::CacheStorage;

const CACHE_FILE: &str = "caches.json";

/// A stored response plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub url: String,
    pub response: FetchResponse,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Region {
    name: String,
    entries: Vec<StoredEntry>,
}

/// Persistent store serialized to JSON. A `Vec` keeps region order stable.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    regions: Vec<Region>,
}

impl CacheFile {
    fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    fn region_mut(&mut self, name: &str) -> &mut Region {
        if let Some(idx) = self.regions.iter().position(|r| r.name == name) {
            return &mut self.regions[idx];
        }
        self.regions.push(Region {
            name: name.to_string(),
            entries: Vec::new(),
        });
        let last = self.regions.len() - 1;
        &mut self.regions[last]
    }
}

impl Region {
    fn insert(&mut self, url: String, response: FetchResponse, now: DateTime<Utc>) {
        let entry = StoredEntry {
            url,
            response,
            stored_at: now,
        };
        match self.entries.iter_mut().find(|e| e.url == entry.url) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }
}

/// Aggregate storage statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionStats {
    pub name: String,
    pub entries: usize,
    pub bytes: usize,
    pub newest: Option<DateTime<Utc>>,
}

/// Cache regions persisted to a JSON file.
pub struct DiskCacheStorage {
    file: RwLock<CacheFile>,
    path: PathBuf,
}

impl std::fmt::Debug for DiskCacheStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskCacheStorage")
            .field("path", &self.path)
            .finish()
    }
}

impl DiskCacheStorage {
    /// Open (or start) the store under `dir`. A corrupt file starts empty.
    pub fn open_dir(dir: &Path) -> Self {
        let path = dir.join(CACHE_FILE);
        let file = Self::load_from_disk(&path);
        Self {
            file: RwLock::new(file),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Per-region statistics, in region order.
    pub async fn stats(&self) -> Vec<RegionStats> {
        self.file
            .read()
            .await
            .regions
            .iter()
            .map(|region| RegionStats {
                name: region.name.clone(),
                entries: region.entries.len(),
                bytes: region.entries.iter().map(|e| e.response.body.len()).sum(),
                newest: region.entries.iter().map(|e| e.stored_at).max(),
            })
            .collect()
    }

    // -- private helpers ---------------------------------------------------

    fn load_from_disk(path: &Path) -> CacheFile {
        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Cache file is corrupt, starting empty: {}", e);
                    CacheFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(e) => {
                warn!("Failed to read cache file, starting empty: {}", e);
                CacheFile::default()
            }
        }
    }

    /// Persist the current state. Failures are logged; memory stays authoritative.
    fn save_to_disk(&self, file: &CacheFile) {
        match self.write_file(file) {
            Ok(()) => debug!(path = %self.path.display(), "Cache file saved"),
            Err(e) => warn!(path = %self.path.display(), "Failed to save cache file: {}", e),
        }
    }

    fn write_file(&self, file: &CacheFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, region: &str) -> Result<()> {
        let mut file = self.file.write().await;
        if file.region(region).is_none() {
            file.region_mut(region);
            self.save_to_disk(&file);
        }
        Ok(())
    }

    async fn get(&self, region: &str, url: &str) -> Result<Option<FetchResponse>> {
        let file = self.file.read().await;
        Ok(file
            .region(region)
            .and_then(|r| r.entries.iter().find(|e| e.url == url))
            .map(|e| e.response.clone()))
    }

    async fn put(&self, region: &str, url: &str, response: FetchResponse) -> Result<()> {
        let mut file = self.file.write().await;
        file.region_mut(region)
            .insert(url.to_string(), response, Utc::now());
        self.save_to_disk(&file);
        Ok(())
    }

    async fn put_all(&self, region: &str, entries: Vec<(String, FetchResponse)>) -> Result<()> {
        let now = Utc::now();
        let mut file = self.file.write().await;
        let target = file.region_mut(region);
        for (url, response) in entries {
            target.insert(url, response, now);
        }
        self.save_to_disk(&file);
        Ok(())
    }

    async fn delete(&self, region: &str) -> Result<bool> {
        let mut file = self.file.write().await;
        let before = file.regions.len();
        file.regions.retain(|r| r.name != region);
        if file.regions.len() == before {
            return Ok(false);
        }
        self.save_to_disk(&file);
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .file
            .read()
            .await
            .regions
            .iter()
            .map(|r| r.name.clone())
            .collect())
    }

    async fn len(&self, region: &str) -> Result<Option<usize>> {
        Ok(self
            .file
            .read()
            .await
            .region(region)
            .map(|r| r.entries.len()))
    }
}
