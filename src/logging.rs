use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// RUST_LOG wins over `default_level`; `verbose` forces debug output.
pub fn init(default_level: &str, verbose: bool) {
    let mut invalid_level = None;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        EnvFilter::try_new(default_level).unwrap_or_else(|_| {
            invalid_level = Some(default_level.to_string());
            EnvFilter::new("info")
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(level) = invalid_level {
        tracing::warn!(%level, "Invalid log level in config, using info");
    }
}
