//! Media error types and handling
//!
//! This module defines the error types used by device backends and the capture
//! controllers. Device failures are never fatal to a call: callers inspect
//! [`MediaError::is_device_unavailable`] and fall back to an "off" state.

use crate::devices::DeviceKind;
use thiserror::Error;

/// Main error type for media device operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Permission was denied, the device is missing or it could not be opened
    #[error("{device} unavailable: {reason}")]
    DeviceUnavailable {
        /// Device that could not be acquired
        device: DeviceKind,
        /// Why the device could not be acquired
        reason: UnavailableReason,
    },

    /// The request itself was malformed
    #[error("Invalid constraints: {message}")]
    InvalidConstraints {
        /// Error message
        message: String,
    },

    /// A newer acquire or release request replaced this one while it was pending
    #[error("Acquisition superseded by a newer request")]
    Superseded,

    /// Device enumeration failed
    #[error("Device enumeration failed: {reason}")]
    DeviceEnumerationFailed {
        /// Failure reason
        reason: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Why a device could not be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnavailableReason {
    /// The user or platform refused access
    PermissionDenied,
    /// No device of the requested kind exists
    NotFound,
    /// The user dismissed the picker
    Cancelled,
    /// Another capture already holds the device
    InUse,
    /// The backend cannot provide this kind of capture
    Unsupported,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::PermissionDenied => write!(f, "permission denied"),
            UnavailableReason::NotFound => write!(f, "no device found"),
            UnavailableReason::Cancelled => write!(f, "cancelled by user"),
            UnavailableReason::InUse => write!(f, "device in use"),
            UnavailableReason::Unsupported => write!(f, "not supported"),
        }
    }
}

impl MediaError {
    /// Shorthand for a [`MediaError::DeviceUnavailable`]
    pub fn unavailable(device: DeviceKind, reason: UnavailableReason) -> Self {
        MediaError::DeviceUnavailable { device, reason }
    }

    /// Check if this is the recoverable "device unavailable" condition
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, MediaError::DeviceUnavailable { .. })
    }

    /// Check if the request was dropped in favour of a newer one
    pub fn is_superseded(&self) -> bool {
        matches!(self, MediaError::Superseded)
    }

    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::DeviceUnavailable { .. } => ErrorCategory::Device,
            MediaError::InvalidConstraints { .. } => ErrorCategory::Configuration,
            MediaError::Superseded => ErrorCategory::State,
            MediaError::DeviceEnumerationFailed { .. } => ErrorCategory::Device,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration and parameter errors
    Configuration,
    /// Device and hardware errors
    Device,
    /// State management errors
    State,
}
