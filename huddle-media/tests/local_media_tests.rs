//! Tests for the local camera/microphone controller

use huddle_media::*;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn controller() -> (VirtualDevices, LocalMediaController) {
    let devices = VirtualDevices::new();
    let controller = LocalMediaController::new(Arc::new(devices.clone()));
    (devices, controller)
}

#[tokio::test]
async fn test_acquire_and_release() {
    let (devices, controller) = controller();

    let stream = assert_ok!(controller.acquire(true, true).await);
    assert!(controller.is_active());
    assert_eq!(controller.current(), Some(stream.clone()));

    assert!(controller.release());
    assert!(stream.is_released());
    assert!(controller.current().is_none());
    assert_eq!(devices.live_track_count(TrackSource::Camera), 0);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 0);
}

#[tokio::test]
async fn test_release_is_idempotent() {
    let (_devices, controller) = controller();
    assert!(!controller.release());

    assert_ok!(controller.acquire(true, false).await);
    assert!(controller.release());
    assert!(!controller.release());
}

#[tokio::test]
async fn test_denied_camera_is_device_unavailable() {
    let (devices, controller) = controller();
    devices.set_permission(DeviceKind::Camera, Permission::Denied);

    let error = assert_err!(controller.acquire(true, true).await);
    assert!(error.is_device_unavailable());
    assert!(controller.current().is_none());
}

#[tokio::test]
async fn test_reacquire_replaces_current_stream() {
    let (devices, controller) = controller();

    let first = assert_ok!(controller.acquire(true, true).await);
    let second = assert_ok!(controller.acquire(true, false).await);

    assert!(first.is_released());
    assert!(!second.is_released());
    assert_eq!(controller.current(), Some(second));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 0);
}

#[tokio::test]
async fn test_set_track_enabled_keeps_tracks_live() {
    let (_devices, controller) = controller();
    let stream = assert_ok!(controller.acquire(true, true).await);

    assert_eq!(controller.set_track_enabled(TrackKind::Audio, false), 1);
    let audio = &stream.audio_tracks()[0];
    assert!(!audio.is_enabled());
    assert!(audio.is_live());

    assert_eq!(controller.set_track_enabled(TrackKind::Audio, true), 1);
    assert!(audio.is_enabled());
}

#[tokio::test]
async fn test_set_track_enabled_without_stream() {
    let (_devices, controller) = controller();
    assert_eq!(controller.set_track_enabled(TrackKind::Video, false), 0);
}

#[tokio::test]
async fn test_release_supersedes_pending_acquisition() {
    let (devices, controller) = controller();
    devices.hold_requests();

    let pending = controller.acquire(true, true);
    let interrupt = async {
        tokio::task::yield_now().await;
        assert!(!controller.release());
        devices.resume_requests();
    };
    let (result, _) = tokio::join!(pending, interrupt);

    assert_eq!(assert_err!(result), MediaError::Superseded);
    assert!(controller.current().is_none());
    assert!(devices.live_streams().is_empty());
}

#[tokio::test]
async fn test_later_acquire_wins() {
    let (devices, controller) = controller();
    devices.hold_requests();

    let first = controller.acquire(true, true);
    let second = async {
        tokio::task::yield_now().await;
        controller.acquire(true, false).await
    };
    let open = async {
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        devices.resume_requests();
    };
    let (first, second, _) = tokio::join!(first, second, open);

    assert_eq!(assert_err!(first), MediaError::Superseded);
    let second = assert_ok!(second);
    assert_eq!(controller.current(), Some(second));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 0);
}
