//! Pre-call lobby: camera preview and name entry

use crate::event::{Event, EventBus, EventStream};
use crate::session::JoinRequest;
use crate::{HuddleError, HuddleResult};
use huddle_media::{LocalMediaController, MediaDevices, MediaError, MediaStream, TrackKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the preview area shows
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Camera frames from this stream
    Live(MediaStream),
    /// Camera is on but no stream has arrived yet
    Starting,
    /// Camera is off; show the placeholder icon
    Off,
}

/// Lobby state before joining a call
#[derive(Debug)]
pub struct PreCallLobby {
    name: String,
    camera_on: bool,
    mic_on: bool,
    preview: LocalMediaController,
    events: EventBus,
}

impl PreCallLobby {
    /// Create a lobby with camera and microphone on and no preview yet
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            name: String::new(),
            camera_on: true,
            mic_on: true,
            preview: LocalMediaController::new(devices),
            events: EventBus::default(),
        }
    }

    /// Name as typed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the typed name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Camera toggle
    pub fn camera_on(&self) -> bool {
        self.camera_on
    }

    /// Microphone toggle
    pub fn mic_on(&self) -> bool {
        self.mic_on
    }

    /// Subscribe to lobby events
    pub fn subscribe(&mut self) -> EventStream {
        self.events.subscribe()
    }

    /// Whether the join action is enabled
    pub fn can_join(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// What the preview area shows right now
    pub fn preview(&self) -> Preview {
        match (self.camera_on, self.preview.current()) {
            (true, Some(stream)) => Preview::Live(stream),
            (true, None) => Preview::Starting,
            (false, _) => Preview::Off,
        }
    }

    /// Start the camera preview if the camera toggle is on.
    ///
    /// A refused camera turns the toggle off instead of failing.
    pub async fn start_preview(&mut self) -> Preview {
        if !self.camera_on {
            self.stop_preview();
            return Preview::Off;
        }

        match self.preview.acquire(true, self.mic_on).await {
            Ok(stream) => {
                info!("📹 Camera started successfully");
                self.events.emit(Event::PreviewStarted {
                    stream_id: stream.id(),
                });
            }
            Err(MediaError::DeviceUnavailable { device, reason }) => {
                warn!("⚠️ Error accessing camera: {} ({})", device, reason);
                self.camera_on = false;
                self.events.emit(Event::MediaUnavailable { device, reason });
            }
            Err(e) => debug!("Preview request dropped: {}", e),
        }
        self.preview()
    }

    fn stop_preview(&mut self) {
        if self.preview.release() {
            self.events.emit(Event::PreviewStopped);
        }
    }

    /// Flip the camera toggle, starting or releasing the preview
    pub async fn toggle_camera(&mut self) -> Preview {
        self.camera_on = !self.camera_on;
        if self.camera_on {
            self.start_preview().await
        } else {
            self.stop_preview();
            Preview::Off
        }
    }

    /// Flip the microphone toggle; a preview's audio tracks follow the new
    /// state. A preview started with the microphone off has no audio track to
    /// turn on.
    pub fn toggle_mic(&mut self) -> bool {
        self.mic_on = !self.mic_on;
        self.preview.set_track_enabled(TrackKind::Audio, self.mic_on);
        debug!("Lobby microphone: {}", if self.mic_on { "on" } else { "off" });
        self.mic_on
    }

    /// Validate the name and release the preview so the call can take the
    /// devices.
    pub fn join(&mut self) -> HuddleResult<JoinRequest> {
        let display_name = self.name.trim();
        if display_name.is_empty() {
            return Err(HuddleError::InvalidDisplayName);
        }
        let request = JoinRequest {
            display_name: display_name.to_string(),
            muted: !self.mic_on,
            camera_off: !self.camera_on,
        };
        self.stop_preview();
        info!("🚪 {} is joining", request.display_name);
        Ok(request)
    }
}

impl Drop for PreCallLobby {
    fn drop(&mut self) {
        self.preview.release();
    }
}
