use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` wins over `config.level`.
///
/// Logs go to stderr so command output on stdout stays clean. Returns `false`
/// when a global subscriber was already installed; the existing one is kept
/// and told about the rejected setup.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(error = %err, json = config.json, "tracing_init_skipped");
            false
        }
    }
}
