//! Logging infrastructure for the Nuxt CLI.
//!
//! Diagnostics go through `tracing`; operator-facing status lines go through
//! [`crate::ui`]. The subscriber is installed once by the binary before the
//! dispatcher runs.
//!
//! # Verbosity
//!
//! 1. `verbose` (set by `NUXT_DEBUG`): debug level for this crate
//! 2. `quiet`: errors only
//! 3. `RUST_LOG`: custom filter
//! 4. Default: warnings only, so the status lines stay readable

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that switches on debug logging.
pub const DEBUG_ENV: &str = "NUXT_DEBUG";

/// Build the filter for the given flags.
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("nuxt=debug,nuxt_cli=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `try_init` so a second call (tests, embedders that already installed
/// a subscriber) is a no-op instead of a panic.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether `NUXT_DEBUG` asks for verbose output.
pub fn debug_requested() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|v| !v.is_empty() && v != "0" && v != "false")
        .unwrap_or(false)
}
