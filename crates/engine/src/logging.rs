//! Test log subscriber setup

use crate::config::{ConfigError, HarnessConfig};
use tracing::debug;

/// Install a `tracing` fmt subscriber writing through libtest's capture.
///
/// Safe to call from every test: only the first call installs a
/// subscriber, later calls are no-ops.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLevel`] if the configured level is unknown.
pub fn init_logging(config: &HarnessConfig) -> Result<(), ConfigError> {
    let level = config.level()?;
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_test_writer()
        .try_init()
        .is_ok();
    if installed {
        debug!(%level, "Installed test log subscriber");
    }
    Ok(())
}
