//! Configuration: TOML file + environment overrides.
//!
//! Load order: defaults → `config.toml` (if present) → environment. The
//! fallback Gemini credential is read once here and injected into the proxy
//! handler; nothing else reads the environment at request time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Default Gemini model for forwarded requests.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Gemini v1beta REST API base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Proxy (serverless function) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Server-side fallback credential. Prefer `GEMINI_API_KEY` over the file.
    pub api_key: Option<String>,
    /// Model path segment in the upstream URL.
    pub model: String,
    /// Upstream API base (`.../v1beta`).
    pub api_base: String,
    /// Optional request timeout; unset leaves the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1).
    pub bind: String,
    /// Listen port.
    pub port: u16,
    /// Directory holding the web app shell, served as the fallback route.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8888,
            static_dir: None,
        }
    }
}

/// Asset cache worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Origin the app shell is served from; relative asset paths resolve against it.
    pub origin: String,
    /// Directory for the on-disk cache regions.
    pub cache_dir: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8888".to_string(),
            cache_dir: None,
        }
    }
}

impl WorkerConfig {
    /// Cache directory, defaulting to `~/.small-ai/cache`.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".small-ai")
                .join("cache")
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub proxy: ProxyConfig,
    pub server: ServerConfig,
    pub worker: WorkerConfig,
}

impl Config {
    /// Default config file location: `<config_dir>/small-ai/config.toml`.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("small-ai")
            .join("config.toml")
    }

    /// Load from `path` (or the default location) and apply environment overrides.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::path);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(data) => Self::from_toml(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(Error::Io(e)),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.proxy.api_key = Some(key);
        }
        if let Some(model) = lookup("SMALL_AI_MODEL").filter(|m| !m.is_empty()) {
            self.proxy.model = model;
        }
        if let Some(bind) = lookup("SMALL_AI_BIND").filter(|b| !b.is_empty()) {
            self.server.bind = bind;
        }
        if let Some(port) = lookup("SMALL_AI_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("SMALL_AI_PORT is not a valid port: {}", port)))?;
        }
        if let Some(origin) = lookup("SMALL_AI_ORIGIN").filter(|o| !o.is_empty()) {
            self.worker.origin = origin;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert!(cfg.proxy.api_key.is_none());
        assert_eq!(cfg.proxy.model, DEFAULT_MODEL);
        assert_eq!(cfg.proxy.api_base, DEFAULT_API_BASE);
        assert!(cfg.proxy.timeout_secs.is_none());
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 8888);
        assert_eq!(cfg.worker.origin, "http://localhost:8888");
    }

    #[test]
    fn test_config_partial_toml() {
        let cfg = Config::from_toml(
            r#"
            [proxy]
            model = "gemini-2.0-flash"

            [server]
            port = 3000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.proxy.model, "gemini-2.0-flash");
        assert_eq!(cfg.proxy.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.bind, "127.0.0.1");
    }

    #[test]
    fn test_config_malformed_toml_is_error() {
        let err = Config::from_toml("[server]\nport = \"nope\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_key_overrides_file_key() {
        let mut cfg = Config::from_toml("[proxy]\napi_key = \"file-key\"").unwrap();
        cfg.apply_env_overrides(env(&[("GEMINI_API_KEY", "env-key")]))
            .unwrap();
        assert_eq!(cfg.proxy.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_empty_env_key_is_ignored() {
        let mut cfg = Config::from_toml("[proxy]\napi_key = \"file-key\"").unwrap();
        cfg.apply_env_overrides(env(&[("GEMINI_API_KEY", "")]))
            .unwrap();
        assert_eq!(cfg.proxy.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_env_port_override() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(env(&[("SMALL_AI_PORT", "9000"), ("SMALL_AI_BIND", "0.0.0.0")]))
            .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.bind, "0.0.0.0");
    }

    #[test]
    fn test_env_invalid_port_is_error() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env_overrides(env(&[("SMALL_AI_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("SMALL_AI_PORT"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.server.port, 8888);
    }

    #[test]
    fn test_worker_cache_dir_explicit() {
        let cfg = WorkerConfig {
            cache_dir: Some(PathBuf::from("/tmp/sa-cache")),
            ..Default::default()
        };
        assert_eq!(cfg.cache_dir(), PathBuf::from("/tmp/sa-cache"));
    }
}
