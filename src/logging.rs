//! Logging init: stderr, plain text or JSON lines.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,small_ai=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global tracing subscriber.
///
/// `json = true` emits one JSON object per event, suitable for log shipping
/// from a hosted function runtime. Calling this twice is a no-op.
pub fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).try_init()
    };

    if result.is_ok() {
        tracing::debug!(json, "small-ai logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }

    #[test]
    fn test_default_filter_parses() {
        let _ = EnvFilter::new(DEFAULT_FILTER);
    }
}
