//! Structured debug logging setup

use crate::DiagnosticsError;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "HUDDLE_LOG";

/// Installs the process-wide `tracing` subscriber
#[derive(Debug, Default)]
pub struct DebugLogger;

impl DebugLogger {
    /// Build the filter: `HUDDLE_LOG` when set and valid, otherwise `filter`
    pub fn filter(filter: &str) -> Result<EnvFilter, DiagnosticsError> {
        if let Ok(env_filter) = EnvFilter::try_from_env(LOG_ENV) {
            return Ok(env_filter);
        }
        EnvFilter::try_new(filter).map_err(|e| DiagnosticsError::InvalidFilter {
            filter: filter.to_string(),
            reason: e.to_string(),
        })
    }

    /// Initialize the fmt subscriber.
    ///
    /// Returns `Ok(false)` when a global subscriber was already installed.
    pub fn init_logging(filter: &str) -> Result<bool, DiagnosticsError> {
        let env_filter = Self::filter(filter)?;
        let installed = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!("🔍 Debug logging enabled");
        }
        Ok(installed)
    }
}
