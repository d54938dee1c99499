//! Screen routing between the lobby and the call

use crate::controls::ControlAction;
use crate::event::Event;
use crate::lobby::{PreCallLobby, Preview};
use crate::session::{CallSession, SessionFlags};
use crate::{Huddle, HuddleError, HuddleResult};
use tracing::info;

/// The screen currently shown
#[derive(Debug)]
pub enum Screen {
    /// Pre-call lobby
    Lobby(PreCallLobby),
    /// In a call
    InCall(CallSession),
}

impl Screen {
    /// Screen name used in state errors
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Lobby(_) => "lobby",
            Screen::InCall(_) => "in_call",
        }
    }
}

/// Application state: one screen at a time
#[derive(Debug)]
pub struct App {
    huddle: Huddle,
    screen: Screen,
}

impl App {
    /// Start on a fresh lobby; call [`App::open_lobby`] to start the preview
    pub fn new(huddle: Huddle) -> Self {
        let lobby = huddle.lobby();
        Self {
            huddle,
            screen: Screen::Lobby(lobby),
        }
    }

    /// Current screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Check if a call is in progress
    pub fn in_call(&self) -> bool {
        matches!(self.screen, Screen::InCall(_))
    }

    /// The lobby, if shown
    pub fn lobby_mut(&mut self) -> HuddleResult<&mut PreCallLobby> {
        match &mut self.screen {
            Screen::Lobby(lobby) => Ok(lobby),
            other => Err(HuddleError::invalid_state("lobby", other.name())),
        }
    }

    /// The call, if in one
    pub fn call_mut(&mut self) -> HuddleResult<&mut CallSession> {
        match &mut self.screen {
            Screen::InCall(session) => Ok(session),
            other => Err(HuddleError::invalid_state("in_call", other.name())),
        }
    }

    /// Start the lobby's camera preview
    pub async fn open_lobby(&mut self) -> HuddleResult<Preview> {
        Ok(self.lobby_mut()?.start_preview().await)
    }

    /// Leave the lobby and enter the call under the typed name
    pub async fn join(&mut self) -> HuddleResult<SessionFlags> {
        let request = self.lobby_mut()?.join()?;
        let mut session = self.huddle.call(request);
        let flags = session.start().await;
        self.screen = Screen::InCall(session);
        Ok(flags)
    }

    /// End the call and return to an empty lobby with its preview running
    pub async fn leave(&mut self) -> HuddleResult<SessionFlags> {
        let flags = self.call_mut()?.leave();
        info!("🏠 Back to the lobby");
        self.screen = Screen::Lobby(self.huddle.lobby());
        self.open_lobby().await?;
        Ok(flags)
    }

    /// Apply device notifications the platform queued since the last call,
    /// such as a share stopped from the browser's own controls. Returns the
    /// events they produced; nothing happens outside a call.
    pub fn process_events(&mut self) -> Vec<Event> {
        match &mut self.screen {
            Screen::InCall(session) => session.process_pending_events(),
            Screen::Lobby(_) => Vec::new(),
        }
    }

    /// Route a control-bar press. Pending platform notifications are applied
    /// first, so the press acts on the state the user sees.
    pub async fn dispatch(&mut self, action: ControlAction) -> HuddleResult<SessionFlags> {
        self.process_events();
        if action == ControlAction::LeaveCall {
            return self.leave().await;
        }
        let session = self.call_mut()?;
        let flags = match action {
            ControlAction::ToggleMute => session.toggle_mute().await,
            ControlAction::ToggleCamera => session.toggle_camera().await,
            ControlAction::ToggleScreenShare => session.toggle_screen_share().await,
            ControlAction::LeaveCall => session.flags(),
        };
        Ok(flags)
    }
}
