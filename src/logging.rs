use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "info";

/// Filter from a `RUST_LOG`-style value. Missing or unparsable values fall
/// back to `info`.
pub fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber, writing to stderr so stdout stays the console.
pub fn init() {
    let raw = std::env::var("RUST_LOG").ok();
    fmt()
        .with_env_filter(env_filter(raw.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}
