//! Logging setup for the binaries.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, LevelFilter};

use crate::config::ENV_LOG;

/// Initializes logging for a mock executable.
///
/// Mocks share stderr with the code under test, so they stay silent unless
/// `CMDMOCK_LOG` carries filter directives (e.g. `CMDMOCK_LOG=debug`).
pub fn init_mock_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("off"));

    // A subscriber may already be installed when called from a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Initializes logging for the `cmdmock` admin tool.
/// Default level is INFO. Use -v for DEBUG, -vv for TRACE, -q for errors only.
pub fn init_cli_logging(verbose: u8, quiet: bool) {
    let level = cli_level(verbose, quiet);

    let filter = EnvFilter::from_default_env().add_directive(
        format!("cmdmock={}", level)
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cli_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
