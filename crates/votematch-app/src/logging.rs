use tracing_subscriber::{EnvFilter, fmt};

/// Install the process-wide subscriber: human-readable events on stderr,
/// level taken from `RUST_LOG` with an `info` default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    // Ignore error if a global subscriber is already set (e.g., in tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
