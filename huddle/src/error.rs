//! Error types for Huddle

use huddle_media::MediaError;
use thiserror::Error;

/// Main error type for Huddle operations
#[derive(Error, Debug)]
pub enum HuddleError {
    /// Initialization error
    #[error("Initialization failed: {reason}")]
    Initialization {
        /// Reason for initialization failure
        reason: String,
    },

    /// Configuration could not be parsed or is inconsistent
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },

    /// Display name is empty once trimmed
    #[error("Display name must not be empty")]
    InvalidDisplayName,

    /// Invalid state error
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Media device error
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

/// Result type alias for Huddle operations
pub type HuddleResult<T> = Result<T, HuddleError>;

impl HuddleError {
    /// Get error code for programmatic handling
    pub fn error_code(&self) -> String {
        match self {
            HuddleError::Initialization { .. } => "INITIALIZATION_FAILED".to_string(),
            HuddleError::Configuration { .. } => "INVALID_CONFIGURATION".to_string(),
            HuddleError::InvalidDisplayName => "INVALID_DISPLAY_NAME".to_string(),
            HuddleError::InvalidState { .. } => "INVALID_STATE".to_string(),
            HuddleError::Media(MediaError::DeviceUnavailable { .. }) => {
                "DEVICE_UNAVAILABLE".to_string()
            }
            HuddleError::Media(_) => "MEDIA_ERROR".to_string(),
        }
    }

    pub(crate) fn invalid_state(expected: &str, actual: &str) -> Self {
        HuddleError::InvalidState {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
