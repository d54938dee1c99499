//! Platform media device interface
//!
//! [`MediaDevices`] is the seam between Huddle and whatever actually owns the
//! camera, microphone and screen: a browser, an OS capture API, or the
//! in-memory [`VirtualDevices`](crate::capture::VirtualDevices) used in tests.

use crate::error::{MediaError, MediaResult};
use crate::stream::MediaStream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Video input
    Camera,
    /// Audio input
    Microphone,
    /// Display / window capture
    Display,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Camera => write!(f, "camera"),
            DeviceKind::Microphone => write!(f, "microphone"),
            DeviceKind::Display => write!(f, "display"),
        }
    }
}

/// Device information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Camera/microphone request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// Request a camera track
    pub video: bool,
    /// Request a microphone track
    pub audio: bool,
}

impl MediaConstraints {
    pub const fn new(video: bool, audio: bool) -> Self {
        Self { video, audio }
    }

    /// Camera and microphone
    pub const fn camera_and_microphone() -> Self {
        Self::new(true, true)
    }

    /// Validate constraints
    pub fn validate(&self) -> MediaResult<()> {
        if !self.video && !self.audio {
            return Err(MediaError::InvalidConstraints {
                message: "at least one of video or audio must be requested".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self::camera_and_microphone()
    }
}

/// Display capture request. Video is always captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConstraints {
    /// Also capture system audio when the platform offers it
    pub audio: bool,
}

impl Default for DisplayConstraints {
    fn default() -> Self {
        Self { audio: true }
    }
}

/// Platform media-device access
#[async_trait]
pub trait MediaDevices: Send + Sync + std::fmt::Debug {
    /// Request camera and/or microphone access
    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<MediaStream>;

    /// Request display capture; the user picks what to share
    async fn get_display_media(&self, constraints: DisplayConstraints)
        -> MediaResult<MediaStream>;

    /// List the capture devices the platform exposes
    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>>;
}
