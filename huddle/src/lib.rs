//! # Huddle - Local Video-Call Sessions
//!
//! Huddle models a video call from the local user's side: a pre-call lobby
//! with a camera preview and name entry, and an in-call session with mute,
//! camera and screen-share controls over a participant grid. Every "call"
//! behaviour is local media-device access wired to local state; there is no
//! transport or signaling.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use huddle::{ControlAction, GridLayout, Huddle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), huddle::HuddleError> {
//!     let mut app = Huddle::init()?.app();
//!
//!     app.open_lobby().await?;
//!     app.lobby_mut()?.set_name("Alice");
//!     app.join().await?;
//!
//!     app.dispatch(ControlAction::ToggleMute).await?;
//!     let grid = GridLayout::build(&app.call_mut()?.participants());
//!     println!("{} columns", grid.columns);
//!
//!     app.dispatch(ControlAction::LeaveCall).await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export media types for easy access
pub use huddle_media::{
    DeviceKind, LocalMediaController, MediaDevices, MediaError, MediaStream, MediaTrack,
    Permission, PickerOutcome, ScreenShareController, StreamId, TrackKind, UnavailableReason,
    VirtualDevices,
};

#[cfg(feature = "diagnostics")]
pub use huddle_diagnostics::{CallReport, DebugLogger, StreamReport};

// Public API modules
pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod event;
pub mod layout;
pub mod lobby;
pub mod participant;
pub mod session;

// Re-export main API types
pub use app::{App, Screen};
pub use config::{GlobalConfig, PlaceholderParticipant};
pub use controls::{ControlAction, ControlBar, LobbyView};
pub use error::{HuddleError, HuddleResult};
pub use event::{Event, EventStream, StopReason};
pub use layout::{grid_columns, GridLayout, Tile, TileContent};
pub use lobby::{PreCallLobby, Preview};
pub use participant::{Participant, ParticipantId};
pub use session::{CallSession, JoinRequest, SessionFlags};

use std::sync::Arc;

/// Main entry point for Huddle
#[derive(Debug, Clone)]
pub struct Huddle {
    inner: Arc<HuddleInner>,
}

#[derive(Debug)]
struct HuddleInner {
    config: GlobalConfig,
    devices: Arc<dyn MediaDevices>,
}

impl Huddle {
    /// Initialize Huddle with default settings and the default device backend
    ///
    /// # Example
    /// ```rust,no_run
    /// use huddle::Huddle;
    ///
    /// let huddle = Huddle::init()?;
    /// # Ok::<(), huddle::HuddleError>(())
    /// ```
    pub fn init() -> HuddleResult<Self> {
        Self::init_with(GlobalConfig::default())
    }

    /// Initialize with custom global configuration
    pub fn init_with(config: GlobalConfig) -> HuddleResult<Self> {
        Self::with_devices(config, huddle_media::default_devices())
    }

    /// Initialize with an explicit device backend
    ///
    /// # Example
    /// ```rust
    /// use huddle::{GlobalConfig, Huddle, VirtualDevices};
    /// use std::sync::Arc;
    ///
    /// let devices = VirtualDevices::new();
    /// let huddle = Huddle::with_devices(GlobalConfig::default(), Arc::new(devices))?;
    /// assert!(!huddle.config().debug_logging);
    /// # Ok::<(), huddle::HuddleError>(())
    /// ```
    pub fn with_devices(config: GlobalConfig, devices: Arc<dyn MediaDevices>) -> HuddleResult<Self> {
        config.validate()?;

        #[cfg(feature = "diagnostics")]
        if config.debug_logging {
            DebugLogger::init_logging(&config.log_filter).map_err(|e| {
                HuddleError::Initialization {
                    reason: format!("Failed to initialize logging: {}", e),
                }
            })?;
        }

        Ok(Self {
            inner: Arc::new(HuddleInner { config, devices }),
        })
    }

    /// Global configuration
    pub fn config(&self) -> &GlobalConfig {
        &self.inner.config
    }

    /// Device backend in use
    pub fn devices(&self) -> Arc<dyn MediaDevices> {
        self.inner.devices.clone()
    }

    /// Create a pre-call lobby
    pub fn lobby(&self) -> PreCallLobby {
        PreCallLobby::new(self.devices())
    }

    /// Create a call session for a join request
    pub fn call(&self, request: JoinRequest) -> CallSession {
        CallSession::new(request, self.devices(), &self.inner.config)
    }

    /// Create an app starting on the lobby screen
    pub fn app(&self) -> App {
        App::new(self.clone())
    }
}
