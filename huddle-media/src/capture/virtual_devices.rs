//! In-memory device backend
//!
//! Behaves like a browser's `navigator.mediaDevices` with scripted answers:
//! permissions, device presence and the display picker outcome are settings,
//! pending requests can be held at a gate, and the platform "stop sharing"
//! button is [`VirtualDevices::end_display_capture`].

use crate::devices::{DeviceInfo, DeviceKind, DisplayConstraints, MediaConstraints, MediaDevices};
use crate::error::{MediaError, MediaResult, UnavailableReason};
use crate::stream::{MediaStream, StreamId, StreamSource};
use crate::tracks::{MediaTrack, TrackSource};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Answer to a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// What the user does with the display picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Pick a screen and share it
    Share,
    /// Dismiss the picker
    Cancel,
    /// The platform has no display capture
    Unsupported,
}

/// Scripted platform behaviour
#[derive(Debug, Clone)]
pub struct VirtualSettings {
    pub devices: Vec<DeviceInfo>,
    pub camera: Permission,
    pub microphone: Permission,
    pub display_picker: PickerOutcome,
    /// Refuse a second concurrent capture of the same camera or microphone
    pub exclusive_capture: bool,
}

impl Default for VirtualSettings {
    fn default() -> Self {
        Self {
            devices: vec![
                DeviceInfo::new("virtual-camera-0", "Virtual Camera", DeviceKind::Camera),
                DeviceInfo::new("virtual-mic-0", "Virtual Microphone", DeviceKind::Microphone),
                DeviceInfo::new("virtual-display-0", "Screen 1", DeviceKind::Display),
            ],
            camera: Permission::Granted,
            microphone: Permission::Granted,
            display_picker: PickerOutcome::Share,
            exclusive_capture: true,
        }
    }
}

/// Virtual media devices for tests, demos and headless hosts
#[derive(Debug, Clone)]
pub struct VirtualDevices {
    inner: Arc<VirtualInner>,
}

#[derive(Debug)]
struct VirtualInner {
    settings: RwLock<VirtualSettings>,
    gate: watch::Sender<bool>,
    live: DashMap<StreamId, MediaStream>,
    requests: AtomicUsize,
}

impl VirtualDevices {
    /// One camera, one microphone, one screen, everything granted
    pub fn new() -> Self {
        Self::with_settings(VirtualSettings::default())
    }

    pub fn with_settings(settings: VirtualSettings) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            inner: Arc::new(VirtualInner {
                settings: RwLock::new(settings),
                gate,
                live: DashMap::new(),
                requests: AtomicUsize::new(0),
            }),
        }
    }

    /// Current settings
    pub fn settings(&self) -> VirtualSettings {
        self.inner.settings.read().clone()
    }

    /// Change settings in place
    pub fn update(&self, f: impl FnOnce(&mut VirtualSettings)) {
        f(&mut self.inner.settings.write());
    }

    /// Answer future camera or microphone prompts with `permission`
    pub fn set_permission(&self, kind: DeviceKind, permission: Permission) {
        self.update(|s| match kind {
            DeviceKind::Camera => s.camera = permission,
            DeviceKind::Microphone => s.microphone = permission,
            DeviceKind::Display => {
                s.display_picker = match permission {
                    Permission::Granted => PickerOutcome::Share,
                    Permission::Denied => PickerOutcome::Cancel,
                }
            }
        });
    }

    pub fn set_display_picker(&self, outcome: PickerOutcome) {
        self.update(|s| s.display_picker = outcome);
    }

    /// Unplug every device of a kind
    pub fn remove_devices(&self, kind: DeviceKind) {
        self.update(|s| s.devices.retain(|d| d.kind != kind));
    }

    /// Hold new and pending requests until [`VirtualDevices::resume_requests`]
    pub fn hold_requests(&self) {
        self.inner.gate.send_replace(false);
    }

    /// Let held requests be answered
    pub fn resume_requests(&self) {
        self.inner.gate.send_replace(true);
    }

    /// Number of acquisition requests received so far
    pub fn requests(&self) -> usize {
        self.inner.requests.load(Ordering::SeqCst)
    }

    /// Streams still holding a device
    pub fn live_streams(&self) -> Vec<MediaStream> {
        self.prune();
        self.inner.live.iter().map(|e| e.value().clone()).collect()
    }

    /// Live tracks from one source, i.e. how many "recording" indicators the
    /// platform would show for it
    pub fn live_track_count(&self, source: TrackSource) -> usize {
        self.live_streams()
            .iter()
            .flat_map(|s| s.tracks().iter())
            .filter(|t| t.source() == source && t.is_live())
            .count()
    }

    /// Simulate the user pressing the platform's "stop sharing" button.
    /// Returns how many display tracks were ended.
    pub fn end_display_capture(&self) -> usize {
        let mut ended = 0;
        for stream in self.live_streams() {
            if stream.source() != StreamSource::Display {
                continue;
            }
            for track in stream.video_tracks() {
                if track.end_by_platform() {
                    ended += 1;
                }
            }
        }
        info!("🖥️ Platform ended {} display track(s)", ended);
        ended
    }

    fn prune(&self) {
        self.inner.live.retain(|_, stream| stream.is_active());
    }

    async fn wait_for_gate(&self) {
        let mut rx = self.inner.gate.subscribe();
        loop {
            let open = *rx.borrow_and_update();
            if open {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn device_label(settings: &VirtualSettings, kind: DeviceKind) -> Option<String> {
        settings
            .devices
            .iter()
            .find(|d| d.kind == kind)
            .map(|d| d.label.clone())
    }

    fn check_device(
        &self,
        settings: &VirtualSettings,
        kind: DeviceKind,
        permission: Permission,
        source: TrackSource,
    ) -> MediaResult<String> {
        let label = Self::device_label(settings, kind)
            .ok_or_else(|| MediaError::unavailable(kind, UnavailableReason::NotFound))?;
        if permission == Permission::Denied {
            return Err(MediaError::unavailable(kind, UnavailableReason::PermissionDenied));
        }
        if settings.exclusive_capture && self.live_track_count(source) > 0 {
            return Err(MediaError::unavailable(kind, UnavailableReason::InUse));
        }
        Ok(label)
    }

    fn register(&self, stream: MediaStream) -> MediaStream {
        self.inner.live.insert(stream.id(), stream.clone());
        stream
    }
}

impl Default for VirtualDevices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDevices for VirtualDevices {
    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<MediaStream> {
        constraints.validate()?;
        self.inner.requests.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        let settings = self.settings();
        let mut tracks = Vec::new();
        if constraints.video {
            let label =
                self.check_device(&settings, DeviceKind::Camera, settings.camera, TrackSource::Camera)?;
            tracks.push(MediaTrack::new(TrackSource::Camera, label));
        }
        if constraints.audio {
            let label = match self.check_device(
                &settings,
                DeviceKind::Microphone,
                settings.microphone,
                TrackSource::Microphone,
            ) {
                Ok(label) => label,
                Err(e) => {
                    // A rejected request hands back nothing
                    for track in &tracks {
                        track.stop();
                    }
                    warn!("🚫 Virtual getUserMedia failed: {}", e);
                    return Err(e);
                }
            };
            tracks.push(MediaTrack::new(TrackSource::Microphone, label));
        }

        let stream = MediaStream::new(StreamSource::UserMedia, tracks);
        debug!(
            "🎥 Virtual getUserMedia granted stream {} (video: {}, audio: {})",
            stream.id(),
            constraints.video,
            constraints.audio
        );
        Ok(self.register(stream))
    }

    async fn get_display_media(
        &self,
        constraints: DisplayConstraints,
    ) -> MediaResult<MediaStream> {
        self.inner.requests.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        let settings = self.settings();
        match settings.display_picker {
            PickerOutcome::Share => {}
            PickerOutcome::Cancel => {
                return Err(MediaError::unavailable(
                    DeviceKind::Display,
                    UnavailableReason::Cancelled,
                ))
            }
            PickerOutcome::Unsupported => {
                return Err(MediaError::unavailable(
                    DeviceKind::Display,
                    UnavailableReason::Unsupported,
                ))
            }
        }
        let label = Self::device_label(&settings, DeviceKind::Display).ok_or_else(|| {
            MediaError::unavailable(DeviceKind::Display, UnavailableReason::NotFound)
        })?;

        let mut tracks = vec![MediaTrack::new(TrackSource::Screen, label)];
        if constraints.audio {
            tracks.push(MediaTrack::new(TrackSource::SystemAudio, "System Audio"));
        }
        let stream = MediaStream::new(StreamSource::Display, tracks);
        debug!("🖥️ Virtual getDisplayMedia granted stream {}", stream.id());
        Ok(self.register(stream))
    }

    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>> {
        Ok(self.inner.settings.read().devices.clone())
    }
}
