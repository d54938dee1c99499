//! Call control bar and lobby view models

use crate::lobby::{PreCallLobby, Preview};
use crate::session::SessionFlags;
use huddle_media::MediaStream;

/// A control the user can press during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Microphone button
    ToggleMute,
    /// Camera button
    ToggleCamera,
    /// Screen-share button
    ToggleScreenShare,
    /// Hang up
    LeaveCall,
}

/// Button styling hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Default
    Neutral,
    /// Red: muted, camera off, hang up
    Alert,
    /// Blue: sharing
    Highlight,
}

/// One control button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    /// Action fired on press
    pub action: ControlAction,
    /// Accessible label describing what pressing does
    pub label: &'static str,
    /// Styling hint
    pub style: ButtonStyle,
}

/// The bar under the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBar {
    /// Mic, camera, screen share, leave
    pub buttons: Vec<ControlButton>,
    /// Status strip, e.g. "Muted", "Camera Off", "Sharing Screen"
    pub status: Vec<&'static str>,
}

impl ControlBar {
    /// Build the bar for the current flags
    pub fn from_flags(flags: SessionFlags) -> Self {
        let mic = ControlButton {
            action: ControlAction::ToggleMute,
            label: if flags.muted { "Unmute" } else { "Mute" },
            style: if flags.muted {
                ButtonStyle::Alert
            } else {
                ButtonStyle::Neutral
            },
        };
        let camera = ControlButton {
            action: ControlAction::ToggleCamera,
            label: if flags.camera_off {
                "Turn camera on"
            } else {
                "Turn camera off"
            },
            style: if flags.camera_off {
                ButtonStyle::Alert
            } else {
                ButtonStyle::Neutral
            },
        };
        let share = ControlButton {
            action: ControlAction::ToggleScreenShare,
            label: if flags.sharing {
                "Stop sharing"
            } else {
                "Share screen"
            },
            style: if flags.sharing {
                ButtonStyle::Highlight
            } else {
                ButtonStyle::Neutral
            },
        };
        let leave = ControlButton {
            action: ControlAction::LeaveCall,
            label: "Leave call",
            style: ButtonStyle::Alert,
        };

        let mut status = Vec::new();
        if flags.muted {
            status.push("Muted");
        }
        if flags.camera_off {
            status.push("Camera Off");
        }
        if flags.sharing {
            status.push("Sharing Screen");
        }

        Self {
            buttons: vec![mic, camera, share, leave],
            status,
        }
    }

    /// Find the button for an action
    pub fn button(&self, action: ControlAction) -> Option<&ControlButton> {
        self.buttons.iter().find(|b| b.action == action)
    }
}

/// What the lobby preview area shows
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewContent {
    /// Live camera, always muted
    Video(MediaStream),
    /// "Starting camera..."
    Starting,
    /// Crossed-out camera icon
    CameraOffIcon,
}

/// Lobby screen view model
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyView {
    /// Preview area
    pub preview: PreviewContent,
    /// Camera toggle is on
    pub camera_on: bool,
    /// Microphone toggle is on
    pub mic_on: bool,
    /// Join button enabled
    pub join_enabled: bool,
}

impl LobbyView {
    /// Build the view for the lobby's current state
    pub fn from_lobby(lobby: &PreCallLobby) -> Self {
        let preview = match lobby.preview() {
            Preview::Live(stream) => PreviewContent::Video(stream),
            Preview::Starting => PreviewContent::Starting,
            Preview::Off => PreviewContent::CameraOffIcon,
        };
        Self {
            preview,
            camera_on: lobby.camera_on(),
            mic_on: lobby.mic_on(),
            join_enabled: lobby.can_join(),
        }
    }
}
