//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays reserved for command output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Level for the `polyvox` target given the configured level and CLI flags.
///
/// `-q` wins over `-v`; each `-v` raises the level one step.
pub fn effective_level(configured: &str, quiet: bool, verbosity: u8) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Build the filter: `RUST_LOG` when set, otherwise `polyvox=<level>,warn`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("polyvox={level},warn")))
}

/// Initialize console logging.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: &str) {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    if tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(level, "logging initialized");
    }
}
