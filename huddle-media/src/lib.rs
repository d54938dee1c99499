//! # Huddle Media
//!
//! Local media-device access for Huddle: the platform device interface,
//! track and stream handles, and the two capture controllers (camera and
//! microphone, display capture) that own those handles.

#![warn(clippy::all)]

pub mod capture;
pub mod devices;
pub mod error;
pub mod local;
pub mod screen_share;
pub mod stream;
pub mod tracks;

// Re-export main types
pub use capture::{default_devices, Permission, PickerOutcome, VirtualDevices, VirtualSettings};
#[cfg(feature = "native")]
pub use capture::NativeDevices;
pub use devices::{DeviceInfo, DeviceKind, DisplayConstraints, MediaConstraints, MediaDevices};
pub use error::{ErrorCategory, MediaError, MediaResult, UnavailableReason};
pub use local::LocalMediaController;
pub use screen_share::{ScreenShareController, ScreenShareEnded};
pub use stream::{MediaStream, StreamId, StreamSource};
pub use tracks::{EndReason, MediaTrack, TrackId, TrackKind, TrackSource, TrackState};
