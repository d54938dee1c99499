//! Participant representation

use crate::config::PlaceholderParticipant;
use crate::session::SessionFlags;
use huddle_media::MediaStream;
use serde::Serialize;

/// Participant identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Identifier of the local user
    pub fn local() -> Self {
        Self("local".to_string())
    }

    /// Identifier of the `index`-th placeholder participant
    pub fn placeholder(index: usize) -> Self {
        Self(format!("remote-{}", index + 1))
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One call member as the UI sees it. Built fresh from session state for
/// every render.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Display name
    pub name: String,
    /// Microphone is muted
    pub muted: bool,
    /// Camera is off
    pub camera_off: bool,
    /// Sharing a screen
    pub screen_sharing: bool,
    /// This is the local user
    pub is_local: bool,
    /// Stream to display, if any
    pub stream: Option<MediaStream>,
}

impl Participant {
    /// The local user, with the stream resolved for display
    pub fn local(name: &str, flags: SessionFlags, stream: Option<MediaStream>) -> Self {
        Self {
            id: ParticipantId::local(),
            name: name.to_string(),
            muted: flags.muted,
            camera_off: flags.camera_off,
            screen_sharing: flags.sharing,
            is_local: true,
            stream,
        }
    }

    /// A static remote participant without a stream
    pub fn placeholder(index: usize, placeholder: &PlaceholderParticipant) -> Self {
        Self {
            id: ParticipantId::placeholder(index),
            name: placeholder.name.clone(),
            muted: placeholder.muted,
            camera_off: placeholder.camera_off,
            screen_sharing: false,
            is_local: false,
            stream: None,
        }
    }

    /// Avatar letter: the upper-cased first character of the name
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Name as shown under the tile
    pub fn display_label(&self) -> String {
        if self.is_local {
            format!("{} (You)", self.name)
        } else {
            self.name.clone()
        }
    }
}
