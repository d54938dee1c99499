//! Media stream handles
//!
//! A [`MediaStream`] groups the tracks returned by one acquisition. Whoever
//! requested it owns it and must call [`MediaStream::release`] before dropping
//! it, otherwise the platform keeps its "recording" indicator lit.

use crate::tracks::{MediaTrack, TrackKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Unique stream identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(Uuid);

impl StreamId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a stream's media comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamSource {
    /// Camera and/or microphone
    UserMedia,
    /// Display capture
    Display,
}

impl std::fmt::Display for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamSource::UserMedia => write!(f, "user_media"),
            StreamSource::Display => write!(f, "display"),
        }
    }
}

/// Handle to an acquired set of tracks
#[derive(Debug, Clone)]
pub struct MediaStream {
    inner: Arc<StreamInner>,
}

#[derive(Debug)]
struct StreamInner {
    id: StreamId,
    source: StreamSource,
    tracks: Vec<MediaTrack>,
    acquired_at: DateTime<Utc>,
    released: AtomicBool,
}

impl MediaStream {
    /// Wrap freshly acquired tracks
    pub fn new(source: StreamSource, tracks: Vec<MediaTrack>) -> Self {
        Self {
            inner: Arc::new(StreamInner {
                id: StreamId::new(),
                source,
                tracks,
                acquired_at: Utc::now(),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Get stream ID
    pub fn id(&self) -> StreamId {
        self.inner.id
    }

    /// Get stream source
    pub fn source(&self) -> StreamSource {
        self.inner.source
    }

    /// When the platform granted this stream
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.inner.acquired_at
    }

    /// All tracks
    pub fn tracks(&self) -> &[MediaTrack] {
        &self.inner.tracks
    }

    /// Tracks of one kind
    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &MediaTrack> {
        self.inner.tracks.iter().filter(move |t| t.kind() == kind)
    }

    /// Audio tracks
    pub fn audio_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(TrackKind::Audio).cloned().collect()
    }

    /// Video tracks
    pub fn video_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(TrackKind::Video).cloned().collect()
    }

    /// Check whether the stream has at least one track of a kind
    pub fn has_track(&self, kind: TrackKind) -> bool {
        self.tracks_of(kind).next().is_some()
    }

    /// Enable or disable every track of a kind. Returns how many tracks were
    /// touched; a released stream touches none.
    pub fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> usize {
        if self.is_released() {
            return 0;
        }
        let mut count = 0;
        for track in self.tracks_of(kind) {
            track.set_enabled(enabled);
            count += 1;
        }
        count
    }

    /// Whether [`MediaStream::release`] has run
    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Not released and still has a live track
    pub fn is_active(&self) -> bool {
        !self.is_released() && self.inner.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track and mark the handle released.
    ///
    /// Returns `true` for exactly one caller; later calls are no-ops.
    pub fn release(&self) -> bool {
        if self.inner.released.swap(true, Ordering::SeqCst) {
            debug!("Stream {} already released", self.id());
            return false;
        }
        for track in &self.inner.tracks {
            track.stop();
        }
        info!(
            "🛑 Released {} stream {} ({} tracks)",
            self.source(),
            self.id(),
            self.inner.tracks.len()
        );
        true
    }
}

impl PartialEq for MediaStream {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for MediaStream {}
