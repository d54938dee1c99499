//! Tests for the in-call session

use huddle::*;
use huddle_media::TrackSource;
use std::sync::Arc;
use std::time::Duration;

fn huddle_with(devices: &VirtualDevices) -> Huddle {
    Huddle::with_devices(GlobalConfig::default(), Arc::new(devices.clone()))
        .expect("default config is valid")
}

/// Let spawned watcher tasks run
async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

async fn started_call(devices: &VirtualDevices, request: JoinRequest) -> CallSession {
    let mut session = huddle_with(devices).call(request);
    session.start().await;
    session
}

fn audio_enabled(session: &CallSession) -> Vec<bool> {
    session
        .camera_stream()
        .map(|s| s.audio_tracks().iter().map(|t| t.is_enabled()).collect())
        .unwrap_or_default()
}

// ============================================================================
// Start
// ============================================================================

#[tokio::test]
async fn test_start_acquires_camera_and_microphone() {
    let devices = VirtualDevices::new();
    let mut session = huddle_with(&devices).call(JoinRequest::new("Alice"));
    let mut events = session.subscribe();

    let flags = session.start().await;
    assert_eq!(flags, SessionFlags::new(false, false));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 1);

    let stream = session.camera_stream().expect("camera stream");
    assert_eq!(
        events.drain(),
        vec![Event::LocalMediaStarted {
            stream_id: stream.id()
        }]
    );
}

#[tokio::test]
async fn test_start_requests_only_what_the_flags_ask_for() {
    let devices = VirtualDevices::new();
    let session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: true,
            camera_off: false,
        },
    )
    .await;

    let stream = session.camera_stream().expect("camera stream");
    assert!(stream.has_track(TrackKind::Video));
    assert!(!stream.has_track(TrackKind::Audio));
    assert!(session.flags().muted);
}

#[tokio::test]
async fn test_start_with_everything_off_requests_nothing() {
    let devices = VirtualDevices::new();
    let session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: true,
            camera_off: true,
        },
    )
    .await;

    assert_eq!(devices.requests(), 0);
    assert!(session.camera_stream().is_none());
}

#[tokio::test]
async fn test_denied_start_reverts_requested_toggles() {
    let devices = VirtualDevices::new();
    devices.set_permission(DeviceKind::Camera, Permission::Denied);
    let mut session = huddle_with(&devices).call(JoinRequest::new("Alice"));
    let mut events = session.subscribe();

    let flags = session.start().await;
    assert!(flags.camera_off);
    assert!(flags.muted);
    assert!(session.camera_stream().is_none());
    assert!(devices.live_streams().is_empty());
    assert_eq!(
        events.drain(),
        vec![Event::MediaUnavailable {
            device: DeviceKind::Camera,
            reason: UnavailableReason::PermissionDenied,
        }]
    );
}

// ============================================================================
// Mute and camera
// ============================================================================

#[tokio::test]
async fn test_mute_truth_table() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    let track = session.camera_stream().expect("stream").audio_tracks()[0].clone();
    assert_eq!(audio_enabled(&session), vec![true]);

    // unmuted -> muted: audio disabled
    assert!(session.toggle_mute().await.muted);
    assert_eq!(audio_enabled(&session), vec![false]);

    // muted -> unmuted: audio enabled
    assert!(!session.toggle_mute().await.muted);
    assert_eq!(audio_enabled(&session), vec![true]);

    // Toggling never ends the track
    assert!(track.is_live());
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 1);
}

#[tokio::test]
async fn test_camera_toggle_disables_video_without_releasing() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    let mut events = session.subscribe();

    assert!(session.toggle_camera().await.camera_off);
    let stream = session.camera_stream().expect("stream");
    assert!(stream.video_tracks().iter().all(|t| !t.is_enabled()));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);

    assert!(!session.toggle_camera().await.camera_off);
    assert!(stream.video_tracks().iter().all(|t| t.is_enabled()));
    assert_eq!(
        events.drain(),
        vec![
            Event::CameraChanged { camera_off: true },
            Event::CameraChanged { camera_off: false },
        ]
    );
}

#[tokio::test]
async fn test_unmute_with_refused_microphone_stays_muted() {
    let devices = VirtualDevices::new();
    devices.set_permission(DeviceKind::Microphone, Permission::Denied);
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    assert!(session.flags().muted);
    assert!(session.flags().camera_off);
    let mut events = session.subscribe();

    let flags = session.toggle_mute().await;
    assert!(flags.muted);
    assert!(session.camera_stream().is_none());
    assert_eq!(
        events.drain(),
        vec![
            Event::MediaUnavailable {
                device: DeviceKind::Microphone,
                reason: UnavailableReason::PermissionDenied,
            },
            Event::MuteChanged { muted: true },
        ]
    );
}

#[tokio::test]
async fn test_camera_on_after_joining_with_camera_off() {
    let devices = VirtualDevices::new();
    let mut session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: false,
            camera_off: true,
        },
    )
    .await;
    assert_eq!(devices.live_track_count(TrackSource::Camera), 0);
    let audio_only = session.camera_stream().expect("microphone stream");
    assert!(matches!(
        Tile::for_participant(&session.participants()[0]).content,
        TileContent::CameraOff { .. }
    ));

    let flags = session.toggle_camera().await;
    assert!(!flags.camera_off);
    assert!(!flags.muted);
    assert!(audio_only.is_released());
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 1);

    let stream = session.camera_stream().expect("camera stream");
    assert!(stream.has_track(TrackKind::Video));
    let tile = Tile::for_participant(&session.participants()[0]);
    assert_eq!(tile.stream(), Some(&stream));
}

#[tokio::test]
async fn test_unmute_after_joining_muted_keeps_camera() {
    let devices = VirtualDevices::new();
    let mut session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: true,
            camera_off: false,
        },
    )
    .await;

    assert!(!session.toggle_mute().await.muted);
    let stream = session.camera_stream().expect("stream");
    assert!(stream.has_track(TrackKind::Video));
    assert!(stream.has_track(TrackKind::Audio));
    assert_eq!(devices.live_track_count(TrackSource::Camera), 1);
}

#[tokio::test]
async fn test_refused_camera_on_reverts_and_keeps_microphone() {
    let devices = VirtualDevices::new();
    let mut session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: false,
            camera_off: true,
        },
    )
    .await;
    devices.set_permission(DeviceKind::Camera, Permission::Denied);

    let flags = session.toggle_camera().await;
    assert!(flags.camera_off);
    assert!(!flags.muted);
    assert_eq!(devices.live_track_count(TrackSource::Camera), 0);
    assert_eq!(devices.live_track_count(TrackSource::Microphone), 1);
    assert_eq!(audio_enabled(&session), vec![true]);
}

// ============================================================================
// Screen share
// ============================================================================

#[tokio::test]
async fn test_sharing_with_camera_off_shows_screen() {
    let devices = VirtualDevices::new();
    let mut session = started_call(
        &devices,
        JoinRequest {
            display_name: "Alice".to_string(),
            muted: false,
            camera_off: true,
        },
    )
    .await;

    let flags = session.toggle_screen_share().await;
    assert!(flags.sharing);
    assert!(flags.camera_off);

    let screen = session.screen_stream().expect("screen stream");
    let local = &session.participants()[0];
    assert_eq!(local.stream.as_ref(), Some(&screen));

    let tile = Tile::for_participant(local);
    assert_eq!(tile.stream(), Some(&screen));
    assert!(tile.sharing_badge);
}

#[tokio::test]
async fn test_in_app_stop_releases_once_and_reverts() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    let mut events = session.subscribe();

    session.toggle_screen_share().await;
    let screen = session.screen_stream().expect("screen stream");
    assert_eq!(devices.live_track_count(TrackSource::Screen), 1);

    let flags = session.toggle_screen_share().await;
    assert!(!flags.sharing);
    assert!(screen.is_released());
    assert!(!screen.release());
    assert_eq!(devices.live_track_count(TrackSource::Screen), 0);

    settle().await;
    assert!(session.process_pending_events().is_empty());

    let local = &session.participants()[0];
    assert_eq!(local.stream, session.camera_stream());
    assert_eq!(
        events.drain(),
        vec![
            Event::ScreenShareStarted {
                stream_id: screen.id()
            },
            Event::ScreenShareStopped {
                stream_id: screen.id(),
                reason: StopReason::InApp,
            },
        ]
    );
}

#[tokio::test]
async fn test_platform_stop_releases_once_and_reverts() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    session.toggle_screen_share().await;
    let screen = session.screen_stream().expect("screen stream");
    let mut events = session.subscribe();

    assert_eq!(devices.end_display_capture(), 1);
    let event = tokio::time::timeout(Duration::from_secs(1), session.next_event())
        .await
        .expect("stop notification");
    assert_eq!(
        event,
        Some(Event::ScreenShareStopped {
            stream_id: screen.id(),
            reason: StopReason::Platform,
        })
    );

    assert!(!session.flags().sharing);
    assert!(screen.is_released());
    assert!(session.screen_stream().is_none());
    assert_eq!(devices.live_track_count(TrackSource::SystemAudio), 0);
    assert_eq!(events.drain().len(), 1);

    // Sharing can start again
    assert!(session.toggle_screen_share().await.sharing);
}

#[tokio::test]
async fn test_platform_and_in_app_stop_race_stops_once() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    session.toggle_screen_share().await;
    let mut events = session.subscribe();

    devices.end_display_capture();
    session.toggle_screen_share().await;
    settle().await;
    assert!(session.process_pending_events().is_empty());

    let stops: Vec<_> = events
        .drain()
        .into_iter()
        .filter(|e| matches!(e, Event::ScreenShareStopped { .. }))
        .collect();
    assert_eq!(stops.len(), 1);
    assert!(!session.flags().sharing);
}

#[tokio::test]
async fn test_cancelled_picker_leaves_sharing_off() {
    let devices = VirtualDevices::new();
    devices.set_display_picker(PickerOutcome::Cancel);
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    let mut events = session.subscribe();

    assert!(!session.toggle_screen_share().await.sharing);
    assert_eq!(
        events.drain(),
        vec![Event::MediaUnavailable {
            device: DeviceKind::Display,
            reason: UnavailableReason::Cancelled,
        }]
    );
}

// ============================================================================
// Participants and leaving
// ============================================================================

#[tokio::test]
async fn test_participants_include_placeholder() {
    let devices = VirtualDevices::new();
    let session = started_call(&devices, JoinRequest::new("Alice")).await;

    let participants = session.participants();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0].id, ParticipantId::local());
    assert_eq!(participants[0].display_label(), "Alice (You)");
    assert_eq!(participants[1].name, "John Doe");
    assert!(participants[1].stream.is_none());
}

#[tokio::test]
async fn test_leave_releases_everything() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    session.toggle_screen_share().await;
    let mut events = session.subscribe();
    assert_eq!(devices.live_streams().len(), 2);

    session.leave();
    assert!(devices.live_streams().is_empty());

    let events = events.drain();
    assert!(matches!(
        events[0],
        Event::ScreenShareStopped {
            reason: StopReason::CallEnded,
            ..
        }
    ));
    assert_eq!(events.last(), Some(&Event::CallLeft));
}

#[tokio::test]
async fn test_dropping_session_releases_streams() {
    let devices = VirtualDevices::new();
    {
        let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
        session.toggle_screen_share().await;
    }
    assert!(devices.live_streams().is_empty());
}

#[cfg(feature = "diagnostics")]
#[tokio::test]
async fn test_report_lists_held_streams() {
    let devices = VirtualDevices::new();
    let mut session = started_call(&devices, JoinRequest::new("Alice")).await;
    session.toggle_mute().await;

    let report = session.report();
    assert_eq!(report.display_name, "Alice");
    assert!(report.muted);
    assert_eq!(report.participants, 2);
    assert_eq!(report.streams.len(), 1);
    tokio_test::assert_ok!(report.to_json());
}
