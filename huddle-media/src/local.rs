//! Local camera and microphone lifecycle
//!
//! [`LocalMediaController`] owns at most one user-media stream. Handles are
//! cheap to clone and share the same state, so an in-flight acquisition can be
//! overtaken by a later `acquire` or `release` from another handle; the later
//! request wins and the stale result is released on arrival.

use crate::devices::{MediaConstraints, MediaDevices};
use crate::error::{MediaError, MediaResult};
use crate::stream::MediaStream;
use crate::tracks::TrackKind;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acquires, toggles and releases the local camera/microphone stream
#[derive(Debug, Clone)]
pub struct LocalMediaController {
    devices: Arc<dyn MediaDevices>,
    state: Arc<Mutex<LocalState>>,
}

#[derive(Debug, Default)]
struct LocalState {
    current: Option<MediaStream>,
    /// Bumped by every acquire and release
    intent: u64,
}

impl LocalState {
    fn take_current(&mut self) -> Option<MediaStream> {
        self.current.take()
    }
}

impl LocalMediaController {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            state: Arc::new(Mutex::new(LocalState::default())),
        }
    }

    /// Request camera and/or microphone access.
    ///
    /// Any stream held so far is released first. Fails with
    /// [`MediaError::DeviceUnavailable`] when the platform refuses and with
    /// [`MediaError::Superseded`] when a newer request arrived meanwhile.
    pub async fn acquire(&self, video: bool, audio: bool) -> MediaResult<MediaStream> {
        let constraints = MediaConstraints::new(video, audio);
        constraints.validate()?;

        let (ticket, previous) = {
            let mut state = self.state.lock();
            state.intent += 1;
            (state.intent, state.take_current())
        };
        if let Some(previous) = previous {
            previous.release();
        }

        info!("🎥 Requesting user media (video: {}, audio: {})", video, audio);
        let result = self.devices.get_user_media(constraints).await;

        let mut state = self.state.lock();
        if state.intent != ticket {
            drop(state);
            if let Ok(stream) = &result {
                debug!("Discarding stale user media stream {}", stream.id());
                stream.release();
            }
            return Err(MediaError::Superseded);
        }

        match result {
            Ok(stream) => {
                state.current = Some(stream.clone());
                info!("✅ User media started: stream {}", stream.id());
                Ok(stream)
            }
            Err(e) => {
                warn!("❌ Error accessing user media: {}", e);
                Err(e)
            }
        }
    }

    /// Stop every track of the current stream and forget it. Also cancels any
    /// acquisition still pending. Returns `true` if a stream was released.
    pub fn release(&self) -> bool {
        let current = {
            let mut state = self.state.lock();
            state.intent += 1;
            state.take_current()
        };
        match current {
            Some(stream) => stream.release(),
            None => false,
        }
    }

    /// Enable or disable the current stream's tracks of one kind without
    /// re-acquiring. Returns how many tracks changed.
    pub fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> usize {
        match self.current() {
            Some(stream) => stream.set_track_enabled(kind, enabled),
            None => 0,
        }
    }

    /// Stream currently held, if any
    pub fn current(&self) -> Option<MediaStream> {
        self.state.lock().current.clone()
    }

    /// Check if a stream is held
    pub fn is_active(&self) -> bool {
        self.state
            .lock()
            .current
            .as_ref()
            .is_some_and(MediaStream::is_active)
    }
}
