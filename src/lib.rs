//! Small AI edge components.
//!
//! - [`proxy`]: forwards chat-completion requests to the Gemini API, choosing
//!   between a caller-supplied and a server-side credential.
//! - [`worker`]: offline asset cache for the web app (cache-first app shell,
//!   network-only AI host).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod proxy;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result};
