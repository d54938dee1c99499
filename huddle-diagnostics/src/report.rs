//! Serialisable snapshots of held media

use crate::DiagnosticsError;
use chrono::{DateTime, Utc};
use huddle_media::{
    DeviceInfo, DeviceKind, MediaDevices, MediaResult, MediaStream, MediaTrack, StreamId,
    StreamSource, TrackKind, TrackSource, TrackState,
};
use serde::Serialize;

/// One track as seen right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    /// Track kind
    pub kind: TrackKind,
    /// Track source
    pub source: TrackSource,
    /// Device label
    pub label: String,
    /// Enabled flag
    pub enabled: bool,
    /// Live or ended
    pub state: TrackState,
}

impl TrackReport {
    /// Snapshot a track
    pub fn from_track(track: &MediaTrack) -> Self {
        Self {
            kind: track.kind(),
            source: track.source(),
            label: track.label().to_string(),
            enabled: track.is_enabled(),
            state: track.state(),
        }
    }
}

/// One stream and its tracks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    /// Stream identifier
    pub id: StreamId,
    /// User media or display capture
    pub source: StreamSource,
    /// When the platform granted it
    pub acquired_at: DateTime<Utc>,
    /// Released by its owner
    pub released: bool,
    /// Tracks in stream order
    pub tracks: Vec<TrackReport>,
}

impl StreamReport {
    /// Snapshot a stream
    pub fn from_stream(stream: &MediaStream) -> Self {
        Self {
            id: stream.id(),
            source: stream.source(),
            acquired_at: stream.acquired_at(),
            released: stream.is_released(),
            tracks: stream.tracks().iter().map(TrackReport::from_track).collect(),
        }
    }

    /// Count of tracks still live
    pub fn live_tracks(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.state == TrackState::Live)
            .count()
    }
}

/// Call-level snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallReport {
    /// Local display name
    pub display_name: String,
    /// Microphone muted
    pub muted: bool,
    /// Camera off
    pub camera_off: bool,
    /// Sharing a screen
    pub sharing: bool,
    /// Session creation time
    pub started_at: DateTime<Utc>,
    /// Participants in the grid, local user included
    pub participants: usize,
    /// Streams currently held
    pub streams: Vec<StreamReport>,
}

impl CallReport {
    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String, DiagnosticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Devices a backend reports, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceInventory {
    /// Video inputs
    pub cameras: Vec<DeviceInfo>,
    /// Audio inputs
    pub microphones: Vec<DeviceInfo>,
    /// Capturable displays
    pub displays: Vec<DeviceInfo>,
}

impl DeviceInventory {
    /// Enumerate a backend
    pub async fn collect(devices: &dyn MediaDevices) -> MediaResult<Self> {
        let mut inventory = Self::default();
        for device in devices.enumerate_devices().await? {
            match device.kind {
                DeviceKind::Camera => inventory.cameras.push(device),
                DeviceKind::Microphone => inventory.microphones.push(device),
                DeviceKind::Display => inventory.displays.push(device),
            }
        }
        tracing::debug!(
            "Found {} cameras, {} microphones, {} displays",
            inventory.cameras.len(),
            inventory.microphones.len(),
            inventory.displays.len()
        );
        Ok(inventory)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String, DiagnosticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
