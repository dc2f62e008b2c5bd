//! Gemini proxy function: one inbound POST in, one reduced JSON response out.

pub mod error;
pub mod handler;

pub use error::{ProxyError, ProxyResponse};
pub use handler::{ProxyHandler, USER_API_KEY_FIELD};
