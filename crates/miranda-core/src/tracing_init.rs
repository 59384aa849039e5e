//! Tracing/logging initialization.
//!
//! Log records always go to stderr. Stdout belongs to the relayed child output.

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global tracing subscriber.
///
/// * `default_filter` -- filter used when `RUST_LOG` is not set
///   (e.g. `"miranda_core=info,miranda_bootstrapper=info"`).
/// * `log_json` -- when `true`, emit JSON log lines instead of the
///   human-readable format.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    let ansi = std::io::stderr().is_terminal();
    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if let Err(err) = result {
        tracing::debug!(error = %err, "Tracing subscriber already installed, keeping it");
    }
}

/// Default filter directive for a log level, scoped to this workspace's crates.
pub fn default_filter(level: &str) -> String {
    format!("miranda_core={level},miranda_bootstrapper={level}")
}
