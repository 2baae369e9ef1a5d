use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a `--log-level` name to a tracing level directive, falling back to `info`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
