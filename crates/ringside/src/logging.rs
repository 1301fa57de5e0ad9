//! Log output for native hosts (tests, tools embedding the crate).
//!
//! The filter comes from `RUST_LOG`, falling back to `ringside=info`.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "ringside=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init() -> bool {
    fmt().with_env_filter(filter()).with_target(true).try_init().is_ok()
}

/// Install a JSON subscriber, one event per line.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_json() -> bool {
    fmt()
        .json()
        .with_env_filter(filter())
        .with_current_span(false)
        .try_init()
        .is_ok()
}

/// Subscriber writing through the test harness's captured output
pub fn init_for_tests() -> bool {
    fmt()
        .with_env_filter(filter())
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_for_tests();
        assert!(!init());
        assert!(!init_json());
    }
}
