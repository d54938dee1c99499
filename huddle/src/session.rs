//! Call session state
//!
//! [`CallSession`] is the single place the in-call toggles live. The flags
//! change only through the explicit toggles and the device-failure reverts
//! that follow a refused request; stream state never rewrites them.

use crate::config::{GlobalConfig, PlaceholderParticipant};
use crate::event::{Event, EventBus, EventStream, StopReason};
use crate::participant::Participant;
use chrono::{DateTime, Utc};
use huddle_media::{
    DisplayConstraints, LocalMediaController, MediaDevices, MediaError, MediaStream,
    ScreenShareController, ScreenShareEnded, StreamId, TrackKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// The in-call toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionFlags {
    /// Microphone muted
    pub muted: bool,
    /// Camera off
    pub camera_off: bool,
    /// Sharing a screen
    pub sharing: bool,
}

impl SessionFlags {
    /// Flags a call starts with
    pub const fn new(muted: bool, camera_off: bool) -> Self {
        Self {
            muted,
            camera_off,
            sharing: false,
        }
    }

    /// Mute toggled
    pub const fn toggled_mute(self) -> Self {
        Self {
            muted: !self.muted,
            ..self
        }
    }

    /// Camera toggled
    pub const fn toggled_camera(self) -> Self {
        Self {
            camera_off: !self.camera_off,
            ..self
        }
    }

    /// Sharing set
    pub const fn with_sharing(self, sharing: bool) -> Self {
        Self { sharing, ..self }
    }
}

/// Pick the stream shown for the local participant: the screen while sharing,
/// otherwise the camera.
pub fn resolve_display_stream(
    flags: SessionFlags,
    camera: Option<&MediaStream>,
    screen: Option<&MediaStream>,
) -> Option<MediaStream> {
    if flags.sharing {
        screen.cloned()
    } else {
        camera.cloned()
    }
}

/// What a lobby hands over to a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Trimmed, non-empty display name
    pub display_name: String,
    /// Join with the microphone muted
    pub muted: bool,
    /// Join with the camera off
    pub camera_off: bool,
}

impl JoinRequest {
    /// Join with camera and microphone on
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            muted: false,
            camera_off: false,
        }
    }
}

/// A running call
#[derive(Debug)]
pub struct CallSession {
    display_name: String,
    flags: SessionFlags,
    local: LocalMediaController,
    screen: ScreenShareController,
    share_ended: broadcast::Receiver<ScreenShareEnded>,
    /// Display stream the flags currently refer to
    share_stream: Option<StreamId>,
    placeholders: Vec<PlaceholderParticipant>,
    started_at: DateTime<Utc>,
    events: EventBus,
}

impl CallSession {
    /// Create a session; no device is touched until [`CallSession::start`]
    pub fn new(request: JoinRequest, devices: Arc<dyn MediaDevices>, config: &GlobalConfig) -> Self {
        let screen = ScreenShareController::with_constraints(
            devices.clone(),
            DisplayConstraints {
                audio: config.screen_share_audio,
            },
        );
        let share_ended = screen.subscribe();
        info!("📞 Joining call as {}", request.display_name);
        Self {
            display_name: request.display_name,
            flags: SessionFlags::new(request.muted, request.camera_off),
            local: LocalMediaController::new(devices),
            screen,
            share_ended,
            share_stream: None,
            placeholders: config.placeholder_participants.clone(),
            started_at: Utc::now(),
            events: EventBus::default(),
        }
    }

    /// Local user's name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Current toggles
    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// When the session was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Camera/microphone stream, if held
    pub fn camera_stream(&self) -> Option<MediaStream> {
        self.local.current()
    }

    /// Display stream, if held
    pub fn screen_stream(&self) -> Option<MediaStream> {
        self.screen.current()
    }

    /// Subscribe to session events
    pub fn subscribe(&mut self) -> EventStream {
        self.events.subscribe()
    }

    /// Acquire the camera and microphone the flags ask for.
    ///
    /// When the platform refuses, the requested toggles revert to off and the
    /// call carries on without local media.
    pub async fn start(&mut self) -> SessionFlags {
        let video = !self.flags.camera_off;
        let audio = !self.flags.muted;
        if !video && !audio {
            info!("Camera and microphone both off; not requesting user media");
            return self.flags;
        }

        match self.local.acquire(video, audio).await {
            Ok(stream) => {
                self.events.emit(Event::LocalMediaStarted {
                    stream_id: stream.id(),
                });
            }
            Err(MediaError::DeviceUnavailable { device, reason }) => {
                warn!("⚠️ Continuing without local media: {} ({})", device, reason);
                if video {
                    self.flags.camera_off = true;
                }
                if audio {
                    self.flags.muted = true;
                }
                self.events.emit(Event::MediaUnavailable { device, reason });
            }
            Err(e) => debug!("User media request dropped: {}", e),
        }
        self.flags
    }

    /// Flip the microphone toggle. Audio tracks stay live; only their enabled
    /// flag follows the new state. Unmuting with no microphone captured (the
    /// call was joined muted, or the device was refused) asks for it again.
    pub async fn toggle_mute(&mut self) -> SessionFlags {
        self.flags = self.flags.toggled_mute();
        let unmuted = !self.flags.muted;
        if self.local.set_track_enabled(TrackKind::Audio, unmuted) == 0 && unmuted {
            self.recapture(TrackKind::Audio).await;
        }
        info!(
            "🎙️ Microphone toggled: {}",
            if self.flags.muted { "muted" } else { "unmuted" }
        );
        self.events.emit(Event::MuteChanged {
            muted: self.flags.muted,
        });
        self.flags
    }

    /// Flip the camera toggle. Video tracks stay live; only their enabled
    /// flag follows the new state. Turning the camera on with no camera
    /// captured asks for it again.
    pub async fn toggle_camera(&mut self) -> SessionFlags {
        self.flags = self.flags.toggled_camera();
        let camera_on = !self.flags.camera_off;
        if self.local.set_track_enabled(TrackKind::Video, camera_on) == 0 && camera_on {
            self.recapture(TrackKind::Video).await;
        }
        info!(
            "📷 Camera toggled: {}",
            if self.flags.camera_off { "off" } else { "on" }
        );
        self.events.emit(Event::CameraChanged {
            camera_off: self.flags.camera_off,
        });
        self.flags
    }

    /// Re-acquire user media after `turned_on` was switched on without a
    /// track to enable. The replacement stream carries every kind the flags
    /// want. A refusal turns `turned_on` back off and keeps whatever else is
    /// still wanted.
    async fn recapture(&mut self, turned_on: TrackKind) {
        let video = !self.flags.camera_off;
        let audio = !self.flags.muted;
        match self.local.acquire(video, audio).await {
            Ok(stream) => {
                self.events.emit(Event::LocalMediaStarted {
                    stream_id: stream.id(),
                });
            }
            Err(MediaError::DeviceUnavailable { device, reason }) => {
                warn!("⚠️ Could not turn {} on: {} ({})", turned_on, device, reason);
                match turned_on {
                    TrackKind::Video => self.flags.camera_off = true,
                    TrackKind::Audio => self.flags.muted = true,
                }
                self.events.emit(Event::MediaUnavailable { device, reason });

                // The refused request replaced the previous stream
                let video = !self.flags.camera_off;
                let audio = !self.flags.muted;
                if video || audio {
                    match self.local.acquire(video, audio).await {
                        Ok(stream) => self.events.emit(Event::LocalMediaStarted {
                            stream_id: stream.id(),
                        }),
                        Err(MediaError::DeviceUnavailable { device, reason }) => {
                            self.flags.camera_off = true;
                            self.flags.muted = true;
                            self.events.emit(Event::MediaUnavailable { device, reason });
                        }
                        Err(e) => debug!("User media request dropped: {}", e),
                    }
                }
            }
            Err(e) => debug!("User media request dropped: {}", e),
        }
    }

    /// Start sharing when off, stop when on. A dismissed picker leaves
    /// sharing off.
    pub async fn toggle_screen_share(&mut self) -> SessionFlags {
        if self.flags.sharing {
            self.stop_sharing(StopReason::InApp);
            return self.flags;
        }

        match self.screen.acquire().await {
            Ok(stream) => {
                self.share_stream = Some(stream.id());
                self.flags = self.flags.with_sharing(true);
                self.events.emit(Event::ScreenShareStarted {
                    stream_id: stream.id(),
                });
            }
            Err(MediaError::DeviceUnavailable { device, reason }) => {
                self.flags = self.flags.with_sharing(false);
                self.events.emit(Event::MediaUnavailable { device, reason });
            }
            Err(e) => debug!("Display capture request dropped: {}", e),
        }
        self.flags
    }

    fn stop_sharing(&mut self, reason: StopReason) -> Option<Event> {
        // The platform may already have released it; release is idempotent.
        self.screen.release();
        self.flags = self.flags.with_sharing(false);
        let stream_id = self.share_stream.take()?;
        let event = Event::ScreenShareStopped { stream_id, reason };
        self.events.emit(event.clone());
        Some(event)
    }

    /// Apply a platform "stop sharing" notification. Returns the resulting
    /// event, or `None` when the notification refers to a share that already
    /// stopped.
    pub fn apply_share_ended(&mut self, ended: ScreenShareEnded) -> Option<Event> {
        if self.share_stream != Some(ended.stream_id) {
            debug!("Ignoring end of stale share {}", ended.stream_id);
            return None;
        }
        self.stop_sharing(StopReason::Platform)
    }

    /// Wait for the next device notification and apply it
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.share_ended.recv().await {
                Ok(ended) => {
                    if let Some(event) = self.apply_share_ended(ended) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Missed {} screen-share notifications", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Apply every device notification already queued, without waiting
    pub fn process_pending_events(&mut self) -> Vec<Event> {
        let mut applied = Vec::new();
        loop {
            match self.share_ended.try_recv() {
                Ok(ended) => applied.extend(self.apply_share_ended(ended)),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} screen-share notifications", skipped);
                }
                Err(_) => return applied,
            }
        }
    }

    /// The local participant followed by the placeholders
    pub fn participants(&self) -> Vec<Participant> {
        let stream = resolve_display_stream(
            self.flags,
            self.local.current().as_ref(),
            self.screen.current().as_ref(),
        );
        let mut participants = vec![Participant::local(&self.display_name, self.flags, stream)];
        participants.extend(
            self.placeholders
                .iter()
                .enumerate()
                .map(|(index, p)| Participant::placeholder(index, p)),
        );
        participants
    }

    /// Release every stream and end the call
    pub fn leave(&mut self) -> SessionFlags {
        self.stop_sharing(StopReason::CallEnded);
        self.local.release();
        info!("👋 {} left the call", self.display_name);
        self.events.emit(Event::CallLeft);
        self.flags
    }

    /// Snapshot for diagnostics
    #[cfg(feature = "diagnostics")]
    pub fn report(&self) -> huddle_diagnostics::CallReport {
        let streams = [self.local.current(), self.screen.current()]
            .iter()
            .flatten()
            .map(huddle_diagnostics::StreamReport::from_stream)
            .collect();
        huddle_diagnostics::CallReport {
            display_name: self.display_name.clone(),
            muted: self.flags.muted,
            camera_off: self.flags.camera_off,
            sharing: self.flags.sharing,
            started_at: self.started_at,
            participants: self.placeholders.len() + 1,
            streams,
        }
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        self.screen.release();
        self.local.release();
    }
}
