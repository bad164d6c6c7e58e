//! `tracing` subscriber bootstrap.
//!
//! Library code only emits events; installing a subscriber is left to the
//! process entry point (or a test) through [`init`].

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g. `wren_http=trace`.
pub const LOG_ENV: &str = "WREN_LOG";

/// Filter used when [`LOG_ENV`] is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a formatting subscriber filtered by [`LOG_ENV`].
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case for the second and later tests in one test binary.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
