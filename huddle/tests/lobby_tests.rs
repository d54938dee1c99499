//! Tests for the pre-call lobby and its view model

use huddle::controls::PreviewContent;
use huddle::*;
use huddle_media::TrackSource;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn lobby_with(devices: &VirtualDevices) -> PreCallLobby {
    PreCallLobby::new(Arc::new(devices.clone()))
}

#[tokio::test]
async fn test_new_lobby_defaults() {
    let devices = VirtualDevices::new();
    let lobby = lobby_with(&devices);

    assert!(lobby.camera_on());
    assert!(lobby.mic_on());
    assert_eq!(lobby.name(), "");
    assert!(!lobby.can_join());
    assert_eq!(lobby.preview(), Preview::Starting);
}

#[tokio::test]
async fn test_preview_starts_muted_in_view() {
    let devices = VirtualDevices::new();
    let mut lobby = lobby_with(&devices);
    let mut events = lobby.subscribe();

    let Preview::Live(stream) = lobby.start_preview().await else {
        panic!("expected a live preview");
    };
    assert!(stream.has_track(TrackKind::Video));
    assert!(stream.has_track(TrackKind::Audio));
    assert_eq!(
        events.drain(),
        vec![Event::PreviewStarted {
            stream_id: stream.id()
        }]
    );

    let view = LobbyView::from_lobby(&lobby);
    assert_eq!(view.preview, PreviewContent::Video(stream));
}

#[tokio::test]
async fn test_denied_camera_turns_toggle_off() {
    let devices = VirtualDevices::new();
    devices.set_permission(DeviceKind::Camera, Permission::Denied);
    let mut lobby = lobby_with(&devices);
    let mut events = lobby.subscribe();

    assert_eq!(lobby.start_preview().await, Preview::Off);
    assert!(!lobby.camera_on());
    assert!(devices.live_streams().is_empty());
    assert_eq!(
        events.drain(),
        vec![Event::MediaUnavailable {
            device: DeviceKind::Camera,
            reason: UnavailableReason::PermissionDenied,
        }]
    );
    assert_eq!(
        LobbyView::from_lobby(&lobby).preview,
        PreviewContent::CameraOffIcon
    );
}

#[tokio::test]
async fn test_camera_toggle_releases_and_restarts_preview() {
    let devices = VirtualDevices::new();
    let mut lobby = lobby_with(&devices);
    lobby.start_preview().await;
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);

    assert_eq!(lobby.toggle_camera().await, Preview::Off);
    assert_eq!(devices.live_track_count(TrackSource::Camera), 0);

    assert!(matches!(lobby.toggle_camera().await, Preview::Live(_)));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
}

#[tokio::test]
async fn test_mic_toggle_follows_into_preview() {
    let devices = VirtualDevices::new();
    let mut lobby = lobby_with(&devices);
    lobby.start_preview().await;
    let Preview::Live(stream) = lobby.preview() else {
        panic!("expected a live preview");
    };

    assert!(!lobby.toggle_mic());
    assert!(stream.audio_tracks().iter().all(|t| !t.is_enabled()));
    assert!(lobby.toggle_mic());
    assert!(stream.audio_tracks().iter().all(|t| t.is_enabled()));
}

#[tokio::test]
async fn test_join_rejects_blank_name() {
    let devices = VirtualDevices::new();
    let mut lobby = lobby_with(&devices);
    lobby.start_preview().await;

    for name in ["", "   ", "\t\n"] {
        lobby.set_name(name);
        assert!(!lobby.can_join());
        assert!(!LobbyView::from_lobby(&lobby).join_enabled);
        let error = assert_err!(lobby.join());
        assert!(matches!(error, HuddleError::InvalidDisplayName));
    }
    // Preview keeps running after a refused join
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
}

#[tokio::test]
async fn test_join_trims_name_and_releases_preview() {
    let devices = VirtualDevices::new();
    let mut lobby = lobby_with(&devices);
    lobby.start_preview().await;
    lobby.toggle_mic();
    let mut events = lobby.subscribe();

    lobby.set_name("  Alice  ");
    let request = assert_ok!(lobby.join());
    assert_eq!(request.display_name, "Alice");
    assert!(request.muted);
    assert!(!request.camera_off);

    assert!(devices.live_streams().is_empty());
    assert_eq!(events.drain(), vec![Event::PreviewStopped]);
}

#[tokio::test]
async fn test_dropping_lobby_releases_preview() {
    let devices = VirtualDevices::new();
    {
        let mut lobby = lobby_with(&devices);
        lobby.start_preview().await;
        assert_eq!(devices.live_streams().len(), 1);
    }
    assert!(devices.live_streams().is_empty());
}
