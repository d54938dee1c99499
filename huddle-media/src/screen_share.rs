//! Display capture lifecycle
//!
//! Sharing can stop two ways: the in-app control calls
//! [`ScreenShareController::release`], or the user presses the platform's own
//! "stop sharing" button and the video track ends underneath us. Both paths
//! take the current stream out under the same lock and release it through
//! the idempotent [`MediaStream::release`], so the stream is released once and
//! [`ScreenShareEnded`] is published at most once.

use crate::devices::{DisplayConstraints, MediaDevices};
use crate::error::{MediaError, MediaResult};
use crate::stream::{MediaStream, StreamId};
use crate::tracks::EndReason;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Published when sharing was stopped from outside the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenShareEnded {
    /// Stream that ended
    pub stream_id: StreamId,
}

/// Acquires and releases the display capture stream.
///
/// Clones share one state; dropping the last clone releases the stream still
/// being shared.
#[derive(Debug, Clone)]
pub struct ScreenShareController {
    devices: Arc<dyn MediaDevices>,
    constraints: DisplayConstraints,
    state: Arc<Mutex<ShareState>>,
    ended_tx: broadcast::Sender<ScreenShareEnded>,
}

#[derive(Debug, Default)]
struct ShareState {
    current: Option<MediaStream>,
    intent: u64,
}

impl Drop for ShareState {
    fn drop(&mut self) {
        if let Some(stream) = self.current.take() {
            debug!("Controller dropped while sharing; releasing stream {}", stream.id());
            stream.release();
        }
    }
}

impl ScreenShareController {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self::with_constraints(devices, DisplayConstraints::default())
    }

    pub fn with_constraints(devices: Arc<dyn MediaDevices>, constraints: DisplayConstraints) -> Self {
        let (ended_tx, _) = broadcast::channel(16);
        Self {
            devices,
            constraints,
            state: Arc::new(Mutex::new(ShareState::default())),
            ended_tx,
        }
    }

    /// Subscribe to externally triggered ends
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenShareEnded> {
        self.ended_tx.subscribe()
    }

    /// Ask the user what to share.
    ///
    /// A dismissed picker comes back as [`MediaError::DeviceUnavailable`] and
    /// leaves sharing off.
    pub async fn acquire(&self) -> MediaResult<MediaStream> {
        let (ticket, previous) = {
            let mut state = self.state.lock();
            state.intent += 1;
            (state.intent, state.current.take())
        };
        if let Some(previous) = previous {
            previous.release();
        }

        info!("🖥️ Requesting display capture");
        let result = self.devices.get_display_media(self.constraints).await;

        let mut state = self.state.lock();
        if state.intent != ticket {
            drop(state);
            if let Ok(stream) = &result {
                debug!("Discarding stale display stream {}", stream.id());
                stream.release();
            }
            return Err(MediaError::Superseded);
        }

        match result {
            Ok(stream) => {
                state.current = Some(stream.clone());
                drop(state);
                self.watch_for_platform_end(&stream);
                info!("✅ Screen sharing started: stream {}", stream.id());
                Ok(stream)
            }
            Err(e) => {
                warn!("❌ Error starting screen share: {}", e);
                Err(e)
            }
        }
    }

    /// In-app stop. Returns the released stream's id, or `None` when nothing
    /// was being shared (for example the platform already ended it).
    pub fn release(&self) -> Option<StreamId> {
        let current = {
            let mut state = self.state.lock();
            state.intent += 1;
            state.current.take()
        };
        let stream = current?;
        stream.release();
        info!("⏹️ Screen sharing stopped: stream {}", stream.id());
        Some(stream.id())
    }

    /// Stream currently shared, if any
    pub fn current(&self) -> Option<MediaStream> {
        self.state.lock().current.clone()
    }

    /// Check if a display stream is held
    pub fn is_sharing(&self) -> bool {
        self.state.lock().current.is_some()
    }

    fn watch_for_platform_end(&self, stream: &MediaStream) {
        let Some(track) = stream.video_tracks().into_iter().next() else {
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; platform stop for stream {} will not be observed", stream.id());
                return;
            }
        };
        // Weak: dropping the last controller releases the share, which ends
        // the track and lets this task finish.
        let state = Arc::downgrade(&self.state);
        let ended_tx = self.ended_tx.clone();
        let stream_id = stream.id();
        handle.spawn(async move {
            if track.wait_ended().await != EndReason::Platform {
                return;
            }
            if let Some(state) = state.upgrade() {
                finish_platform_end(&state, &ended_tx, stream_id);
            }
        });
    }
}

fn finish_platform_end(
    state: &Mutex<ShareState>,
    ended_tx: &broadcast::Sender<ScreenShareEnded>,
    stream_id: StreamId,
) -> bool {
    let current = {
        let mut state = state.lock();
        let is_current = state
            .current
            .as_ref()
            .is_some_and(|stream| stream.id() == stream_id);
        if is_current {
            state.current.take()
        } else {
            None
        }
    };
    let Some(stream) = current else {
        debug!("Platform end for stale display stream {}", stream_id);
        return false;
    };
    stream.release();
    info!("🖥️ Screen sharing stopped by user: stream {}", stream_id);
    let _ = ended_tx.send(ScreenShareEnded { stream_id });
    true
}

