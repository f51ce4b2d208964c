//! Log output for the `sl` binary
//!
//! Library crates log through the `log` facade. The fmt subscriber picks those
//! records up through its `tracing-log` bridge and writes them to stderr.

use std::io::IsTerminal;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Environment variable holding filter directives, e.g. `sl_deploy=trace`
pub(crate) const LOG_ENV: &str = "SL_LOG";

/// Level used for a run: warnings by default, everything with `--verbose`
pub(crate) fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install the subscriber; a second call leaves the first one in place
pub(crate) fn init(verbose: bool) {
    let directives = std::env::var(LOG_ENV).ok();
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
    if let Err(e) = result {
        log::debug!("Logging already initialised: {e}");
    }
}
