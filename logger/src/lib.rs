//! Common logger configuration for binaries and tests that use `bip321`.
//!
//! The `bip321` library only emits `tracing` events. Something still has to
//! install a subscriber to see them; that's this crate.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    filter::Targets,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Initialize a global `tracing` logger.
///
/// + The logger will print enabled `tracing` events and spans to stderr, so
///   stdout stays free for program output (e.g. a parsed URI as JSON).
/// + The default log level includes INFO, WARN, and ERROR events.
/// + You can change the log level or module filtering with an appropriate
///   `RUST_LOG` env var set, e.g. `RUST_LOG=bip321=debug` shows every problem
///   the parser records. Read more about the syntax here:
///   <https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/targets/struct.Targets.html>
///
/// Panics if a logger is already initialized. This will fail if used in tests,
/// since multiple test threads will compete to set the global logger.
pub fn init() {
    try_init().expect("Failed to setup logger");
}

/// Use this to initialize the global logger in tests.
pub fn init_for_testing() {
    // Quickly skip logger setup if no env var set.
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    // Don't panic if there's already a logger setup. Multiple tests might try
    // setting the global logger.
    let _ = try_init();
}

/// Try to initialize a global logger. Will return an `Err` if there is another
/// global logger already set.
pub fn try_init() -> Result<(), TryInitError> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(targets_filter(std::env::var("RUST_LOG").ok()));

    tracing_subscriber::registry().with(stderr_log).try_init()
}

/// Parse a `RUST_LOG` value into a [`Targets`] filter. Defaults to INFO logs
/// if the value is missing or we can't parse it.
fn targets_filter(rust_log: Option<String>) -> Targets {
    rust_log
        .and_then(|rust_log| Targets::from_str(&rust_log).ok())
        .unwrap_or_else(|| Targets::new().with_default(Level::INFO))
}
