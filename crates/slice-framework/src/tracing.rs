//! # Tracing Setup

/// Initializes structured logging for the process.
///
/// Verbosity follows the `RUST_LOG` environment variable:
/// - `RUST_LOG=info` - slice start/stop and settled requests
/// - `RUST_LOG=debug` - every dispatch with its tag and target
/// - `RUST_LOG=slice_framework=debug,storefront=info` - per-crate levels
///
/// Calling it twice panics, as with any global subscriber.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
