//! Native device backend
//!
//! Cameras are discovered through nokhwa and microphones through cpal. The
//! tracks handed out are logical: they carry the device label and lifecycle,
//! frame delivery belongs to the renderer that consumes them.

use crate::devices::{DeviceInfo, DeviceKind, DisplayConstraints, MediaConstraints, MediaDevices};
use crate::error::{MediaError, MediaResult, UnavailableReason};
use crate::stream::{MediaStream, StreamSource};
use crate::tracks::{MediaTrack, TrackSource};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use nokhwa::utils::ApiBackend;
use tracing::{debug, info, warn};

/// Media devices backed by the host OS
#[derive(Debug, Default)]
pub struct NativeDevices;

impl NativeDevices {
    pub fn new() -> Self {
        Self
    }

    fn query_cameras() -> MediaResult<Vec<DeviceInfo>> {
        let cameras =
            nokhwa::query(ApiBackend::Auto).map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: format!("camera query failed: {}", e),
            })?;
        Ok(cameras
            .iter()
            .map(|info| {
                DeviceInfo::new(
                    format!("camera-{}", info.index()),
                    info.human_name(),
                    DeviceKind::Camera,
                )
            })
            .collect())
    }

    fn query_microphones() -> MediaResult<Vec<DeviceInfo>> {
        let host = cpal::default_host();
        let inputs = host
            .input_devices()
            .map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: format!("audio input query failed: {}", e),
            })?;
        Ok(inputs
            .enumerate()
            .map(|(index, device)| {
                let name = device
                    .name()
                    .unwrap_or_else(|_| format!("Microphone {}", index + 1));
                DeviceInfo::new(format!("microphone-{}", index), name, DeviceKind::Microphone)
            })
            .collect())
    }

    async fn query_all() -> MediaResult<Vec<DeviceInfo>> {
        tokio::task::spawn_blocking(|| -> MediaResult<Vec<DeviceInfo>> {
            let mut devices = Self::query_cameras().unwrap_or_else(|e| {
                warn!("📷 {}", e);
                Vec::new()
            });
            devices.extend(Self::query_microphones()?);
            Ok(devices)
        })
        .await
        .map_err(|e| MediaError::DeviceEnumerationFailed {
            reason: format!("enumeration task failed: {}", e),
        })?
    }

    fn first_label(devices: &[DeviceInfo], kind: DeviceKind) -> MediaResult<String> {
        devices
            .iter()
            .find(|d| d.kind == kind)
            .map(|d| d.label.clone())
            .ok_or_else(|| MediaError::unavailable(kind, UnavailableReason::NotFound))
    }
}

#[async_trait]
impl MediaDevices for NativeDevices {
    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<MediaStream> {
        constraints.validate()?;
        let devices = Self::query_all().await?;

        let mut tracks = Vec::new();
        if constraints.video {
            let label = Self::first_label(&devices, DeviceKind::Camera)?;
            tracks.push(MediaTrack::new(TrackSource::Camera, label));
        }
        if constraints.audio {
            match Self::first_label(&devices, DeviceKind::Microphone) {
                Ok(label) => tracks.push(MediaTrack::new(TrackSource::Microphone, label)),
                Err(e) => {
                    tracks.iter().for_each(|t| {
                        t.stop();
                    });
                    return Err(e);
                }
            }
        }

        let stream = MediaStream::new(StreamSource::UserMedia, tracks);
        info!("🎥 Native capture stream {} opened", stream.id());
        Ok(stream)
    }

    async fn get_display_media(
        &self,
        _constraints: DisplayConstraints,
    ) -> MediaResult<MediaStream> {
        debug!("Display capture requested on native backend");
        Err(MediaError::unavailable(
            DeviceKind::Display,
            UnavailableReason::Unsupported,
        ))
    }

    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>> {
        Self::query_all().await
    }
}
