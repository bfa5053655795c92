//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout is left for the
//! command's own output such as the bundler JSON.

use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `--verbose` and `--quiet` win over `RUST_LOG`; without either flag
/// `RUST_LOG` is honored and the default level is `warn`.
pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))
}
