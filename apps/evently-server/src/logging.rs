//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter precedence: `-v` flags > `RUST_LOG` > `logging.level`.
///
/// External crates (hyper, tower) are held at `warn` unless named explicitly.
fn build_filter(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=warn,tower=warn", cfg.level))),
        1 => EnvFilter::new("debug,hyper=warn,tower=warn"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(cfg: &LoggingConfig, format: Option<LogFormat>, verbose: u8) -> anyhow::Result<()> {
    let filter = build_filter(cfg, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    match format.unwrap_or(cfg.format) {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }
    Ok(())
}
