//! HTTP surface: the proxy function endpoint, a health probe, and the
//! optional static app shell.

pub mod routes;
pub mod server;

pub use server::{build_router, start_server, AppState};
