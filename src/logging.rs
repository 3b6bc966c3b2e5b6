//! Logging initialization
//!
//! Logs go to stderr so that report output on stdout stays machine-readable.

use std::io;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "DECLCHECK_LOG";

static INIT_ONCE: Once = Once::new();

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "declcheck=debug",
        (false, true) => "declcheck=error",
        (false, false) => "declcheck=warn",
    }
}

/// Initialize the tracing subscriber. Later calls are no-ops.
///
/// `DECLCHECK_LOG` overrides the level chosen from the flags.
pub fn init(verbose: bool, quiet: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(verbose)
            .compact();

        // Another subscriber may already be installed (tests, embedding)
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
