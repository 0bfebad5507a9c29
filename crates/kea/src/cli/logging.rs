//! Diagnostic logging setup.
//!
//! Log events go to stderr so that stdout stays clean for keyword and JSON
//! output. `KEA_LOG` takes any `EnvFilter` directive and wins over `-v`.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KEA_LOG";

/// Maps the `-v` count to a default filter level.
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = result {
        eprintln!("warning: failed to initialize logging: {e}");
    }
}
