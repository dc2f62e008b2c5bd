//! Named cache regions of URL-keyed responses.
//!
//! [`CacheStorage`] mirrors the browser's cache storage: regions are opened by
//! name, hold immutable entries, and are purged wholesale by deleting the
//! region. Implementations must be safe for concurrent `get`/`put`.

pub mod disk;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::worker::fetch::FetchResponse;

pub use disk::DiskCacheStorage;
pub use memory::MemoryCacheStorage;

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the region if absent.
    async fn open(&self, region: &str) -> Result<()>;

    /// Look up `url` in one region.
    async fn get(&self, region: &str, url: &str) -> Result<Option<FetchResponse>>;

    /// Store (or overwrite) `url` in `region`, creating the region if needed.
    async fn put(&self, region: &str, url: &str, response: FetchResponse) -> Result<()>;

    /// Store a batch in one step: either every entry lands or none does.
    async fn put_all(&self, region: &str, entries: Vec<(String, FetchResponse)>) -> Result<()>;

    /// Delete a whole region. Returns `false` if it did not exist.
    async fn delete(&self, region: &str) -> Result<bool>;

    /// Names of all regions, in creation order.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Number of entries in a region (`None` if the region does not exist).
    async fn len(&self, region: &str) -> Result<Option<usize>>;

    /// Look up `url` across all regions, oldest region first.
    async fn match_any(&self, url: &str) -> Result<Option<FetchResponse>> {
        for region in self.keys().await? {
            if let Some(hit) = self.get(&region, url).await? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}
