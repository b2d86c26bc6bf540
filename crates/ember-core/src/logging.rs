//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,ember_resources=debug";

/// Install the global `fmt` subscriber with [`DEFAULT_FILTER`].
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global `fmt` subscriber with a custom fallback filter.
///
/// `RUST_LOG` still takes precedence when present.
pub fn init_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::trace!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init_with_filter("warn");
        tracing::debug!("still alive after double init");
    }
}
