//! Track abstractions
//!
//! A [`MediaTrack`] is a single audio or video channel handed out by a device
//! backend. Handles are cheap to clone; every clone observes the same enabled
//! flag and lifecycle state, the way a browser `MediaStreamTrack` is shared
//! between the capturing code and the elements rendering it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// Unique track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Track kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Audio track
    Audio,
    /// Video track
    Video,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// Track source enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackSource {
    /// Camera/webcam video
    Camera,
    /// Microphone audio
    Microphone,
    /// Screen sharing video
    Screen,
    /// System audio captured alongside a screen share
    SystemAudio,
}

impl TrackSource {
    /// Kind of track this source produces
    pub fn kind(&self) -> TrackKind {
        match self {
            TrackSource::Camera | TrackSource::Screen => TrackKind::Video,
            TrackSource::Microphone | TrackSource::SystemAudio => TrackKind::Audio,
        }
    }
}

impl std::fmt::Display for TrackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackSource::Camera => write!(f, "camera"),
            TrackSource::Microphone => write!(f, "microphone"),
            TrackSource::Screen => write!(f, "screen"),
            TrackSource::SystemAudio => write!(f, "system_audio"),
        }
    }
}

/// Why a track ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The application stopped the track
    Stopped,
    /// The platform ended the track (browser chrome, unplugged device)
    Platform,
}

/// Track state enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackState {
    /// Track is capturing
    Live,
    /// Track has ended and will never produce media again
    Ended(EndReason),
}

/// Handle to a single captured audio or video channel
#[derive(Debug, Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

#[derive(Debug)]
struct TrackInner {
    id: TrackId,
    source: TrackSource,
    label: String,
    enabled: AtomicBool,
    state: watch::Sender<TrackState>,
}

impl MediaTrack {
    /// Create a new live, enabled track
    pub fn new(source: TrackSource, label: impl Into<String>) -> Self {
        let (state, _) = watch::channel(TrackState::Live);
        let track = Self {
            inner: Arc::new(TrackInner {
                id: TrackId::new(),
                source,
                label: label.into(),
                enabled: AtomicBool::new(true),
                state,
            }),
        };
        debug!(
            "🎚️ Created {} track {} ({})",
            track.kind(),
            track.id(),
            track.label()
        );
        track
    }

    /// Get track ID
    pub fn id(&self) -> TrackId {
        self.inner.id
    }

    /// Get track kind
    pub fn kind(&self) -> TrackKind {
        self.inner.source.kind()
    }

    /// Get track source
    pub fn source(&self) -> TrackSource {
        self.inner.source
    }

    /// Human readable device label
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Whether the track currently delivers media (a disabled track stays live
    /// but produces silence or black frames)
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the track without ending it
    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.inner.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            debug!(
                "🔀 Track {} ({}) enabled: {} -> {}",
                self.id(),
                self.kind(),
                previous,
                enabled
            );
        }
    }

    /// Get track state
    pub fn state(&self) -> TrackState {
        *self.inner.state.borrow()
    }

    /// Check if the track is still capturing
    pub fn is_live(&self) -> bool {
        self.state() == TrackState::Live
    }

    /// Stop the track. Returns `true` only for the call that ended it.
    pub fn stop(&self) -> bool {
        self.end(EndReason::Stopped)
    }

    /// End the track from the platform side. Returns `true` only for the call
    /// that ended it.
    pub fn end_by_platform(&self) -> bool {
        self.end(EndReason::Platform)
    }

    fn end(&self, reason: EndReason) -> bool {
        let ended = self.inner.state.send_if_modified(|state| {
            if *state == TrackState::Live {
                *state = TrackState::Ended(reason);
                true
            } else {
                false
            }
        });
        if ended {
            debug!("⏹️ Track {} ({}) ended: {:?}", self.id(), self.kind(), reason);
        }
        ended
    }

    /// Wait until the track ends and report why
    pub async fn wait_ended(&self) -> EndReason {
        let mut rx = self.inner.state.subscribe();
        loop {
            let state = *rx.borrow_and_update();
            if let TrackState::Ended(reason) = state {
                return reason;
            }
            if rx.changed().await.is_err() {
                return EndReason::Stopped;
            }
        }
    }
}

impl PartialEq for MediaTrack {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for MediaTrack {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let track = MediaTrack::new(TrackSource::Camera, "Front Camera");
        assert!(track.is_live());
        assert!(track.stop());
        assert!(!track.stop());
        assert!(!track.end_by_platform());
        assert_eq!(track.state(), TrackState::Ended(EndReason::Stopped));
    }

    #[test]
    fn test_disable_keeps_track_live() {
        let track = MediaTrack::new(TrackSource::Microphone, "Built-in Microphone");
        track.set_enabled(false);
        assert!(!track.is_enabled());
        assert!(track.is_live());
        assert_eq!(track.kind(), TrackKind::Audio);
    }

    #[tokio::test]
    async fn test_wait_ended_reports_platform_end() {
        let track = MediaTrack::new(TrackSource::Screen, "Screen 1");
        let watcher = track.clone();
        let handle = tokio::spawn(async move { watcher.wait_ended().await });
        tokio::task::yield_now().await;
        assert!(track.end_by_platform());
        assert_eq!(handle.await.unwrap(), EndReason::Platform);
    }
}
