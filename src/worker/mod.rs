//! Offline asset cache worker.
//!
//! Install pre-caches the app shell, activate purges regions from older
//! versions, and fetch serves app-shell traffic cache-first while the AI host
//! always goes to the network.

pub mod fetch;
pub mod lifecycle;
pub mod manifest;
pub mod offline;

pub use fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher, RequestMode, ResponseKind};
pub use lifecycle::{ActivateReport, AssetCacheWorker, FetchOutcome, InstallReport, WorkerState};
pub use manifest::AssetManifest;
