//! Versioned cache names and the app-shell asset list.

use url::Url;

use crate::error::{Error, Result};

/// App-shell cache region. Bump the version to purge old regions on activate.
pub const APP_SHELL_CACHE: &str = "small-ai-cache-v2.5";

/// Reserved region for API responses. Kept on activate, never written.
pub const API_CACHE: &str = "small-ai-api-cache-v3";

/// Host of the generation API; always network-only.
pub const AI_API_HOST: &str = "generativelanguage.googleapis.com";

/// Assets required to render the app offline. Relative paths resolve against the origin.
pub const APP_SHELL_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/logo.png",
    "https://cdn.tailwindcss.com",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700;800;900&display=swap",
    "https://cdn.jsdelivr.net/npm/marked/marked.min.js",
    "https://cdn.jsdelivr.net/npm/lucide-dynamic@latest/dist/lucide.min.js",
    "https://unpkg.com/lucide@latest",
];

/// Everything the worker needs to know about the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub origin: Url,
    pub cache_name: String,
    pub api_cache_name: String,
    pub api_host: String,
    pub assets: Vec<String>,
}

impl AssetManifest {
    /// The shipped manifest for an app served from `origin`.
    pub fn for_origin(origin: &str) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| Error::Config(format!("invalid worker origin '{}': {}", origin, e)))?;
        Ok(Self {
            origin,
            cache_name: APP_SHELL_CACHE.to_string(),
            api_cache_name: API_CACHE.to_string(),
            api_host: AI_API_HOST.to_string(),
            assets: APP_SHELL_ASSETS.iter().map(|a| a.to_string()).collect(),
        })
    }

    /// Region names that survive activation.
    pub fn current_caches(&self) -> [&str; 2] {
        [&self.cache_name, &self.api_cache_name]
    }

    /// Absolute cache keys for every asset.
    pub fn asset_urls(&self) -> Result<Vec<String>> {
        self.assets.iter().map(|a| self.resolve(a)).collect()
    }

    /// Resolve an asset against the origin and normalise it into a cache key.
    pub fn resolve(&self, asset: &str) -> Result<String> {
        let url = self
            .origin
            .join(asset)
            .map_err(|e| Error::Config(format!("invalid asset URL '{}': {}", asset, e)))?;
        Ok(cache_key(url))
    }
}

/// Cache key for a URL: the absolute URL without its fragment.
pub fn cache_key(mut url: Url) -> String {
    url.set_fragment(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_manifest() {
        let m = AssetManifest::for_origin("http://localhost:8888").unwrap();
        assert_eq!(m.cache_name, "small-ai-cache-v2.5");
        assert_eq!(m.api_cache_name, "small-ai-api-cache-v3");
        assert_eq!(m.api_host, "generativelanguage.googleapis.com");
        assert_eq!(m.assets.len(), 9);
    }

    #[test]
    fn test_relative_assets_resolve_against_origin() {
        let m = AssetManifest::for_origin("https://small-ai.example/").unwrap();
        let urls = m.asset_urls().unwrap();
        assert_eq!(urls[0], "https://small-ai.example/");
        assert_eq!(urls[1], "https://small-ai.example/index.html");
        assert_eq!(urls[4], "https://cdn.tailwindcss.com/");
        assert!(urls[5].starts_with("https://fonts.googleapis.com/css2?family=Inter"));
    }

    #[test]
    fn test_cache_key_drops_fragment() {
        let url = Url::parse("http://localhost/index.html#top").unwrap();
        assert_eq!(cache_key(url), "http://localhost/index.html");
    }

    #[test]
    fn test_invalid_origin_is_config_error() {
        let err = AssetManifest::for_origin("not a url").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
