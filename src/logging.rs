use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILTER_ENV: &str = "ACTIVITY_HISTORY_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Install the stderr subscriber. Stdout stays reserved for the activity
/// report so it can be piped.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}
