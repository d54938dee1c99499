//! Diagnostics error types

use thiserror::Error;

/// Errors raised while setting up diagnostics or rendering reports
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// Log filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// Report could not be serialised
    #[error("Failed to serialise report: {0}")]
    Serialization(#[from] serde_json::Error),
}
