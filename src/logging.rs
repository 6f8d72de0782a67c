use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `fallback`.
/// Calling it twice is harmless; the second call is ignored.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
