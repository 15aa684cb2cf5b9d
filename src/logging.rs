//! Subscriber setup for `tracing` events.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `pkgextract=debug`.
pub const LOG_ENV: &str = "PKGEXTRACT_LOG";

/// Directive used when `PKGEXTRACT_LOG` is unset or invalid.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter for the given `-v` count.
#[must_use]
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Installs a formatted subscriber on stderr.
///
/// Only the first call in a process installs anything; later calls are
/// no-ops, so tests may run the CLI repeatedly.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
