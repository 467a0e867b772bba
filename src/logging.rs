//! Logging initialization.
//!
//! Diagnostics go through `tracing` to stderr; stdout carries only the
//! progress and summary lines from [`output`](crate::output).

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter directive for the given verbosity.
///
/// Quiet runs only show warnings (collisions, failed images); `--verbose`
/// adds run and per-image events.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber.
///
/// `RUST_LOG`, when set, overrides the verbosity flag. With `json_format`
/// every event is one JSON object per line.
pub fn init(verbose: bool, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
