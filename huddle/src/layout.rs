//! Participant grid view model

use crate::participant::{Participant, ParticipantId};
use huddle_media::{MediaStream, TrackKind};

/// Number of grid columns for `count` participants
pub fn grid_columns(count: usize) -> usize {
    match count {
        0 | 1 => 1,
        2..=4 => 2,
        5 | 6 => 3,
        _ => 4,
    }
}

/// What fills a tile
#[derive(Debug, Clone, PartialEq)]
pub enum TileContent {
    /// Render this stream; local playback is muted to avoid feedback
    Video {
        /// Stream to render
        stream: MediaStream,
        /// Mute playback
        muted_playback: bool,
    },
    /// Camera off: initial and a crossed-out camera
    CameraOff {
        /// Avatar letter
        initial: String,
    },
    /// Sharing, but no display stream to show
    SharingPlaceholder {
        /// Caption, e.g. "Alice is sharing screen"
        caption: String,
    },
    /// No stream at all
    Avatar {
        /// Avatar letter
        initial: String,
    },
}

/// Microphone badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicIndicator {
    /// Red, crossed-out microphone
    Muted,
    /// Green microphone
    Live,
}

/// One participant's tile
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Participant shown
    pub participant_id: ParticipantId,
    /// Name label, with "(You)" for the local user
    pub label: String,
    /// Main area
    pub content: TileContent,
    /// Microphone badge
    pub mic: MicIndicator,
    /// Show the "You" badge
    pub local_badge: bool,
    /// Show the screen-share icon next to the name
    pub sharing_badge: bool,
}

impl Tile {
    /// Build the tile for one participant. A screen share wins over the
    /// camera-off placeholder. A stream without video (microphone only) has
    /// nothing to show and falls back to the avatar.
    pub fn for_participant(participant: &Participant) -> Self {
        let video = participant
            .stream
            .as_ref()
            .filter(|stream| stream.has_track(TrackKind::Video));
        let content = match (video, participant.screen_sharing) {
            (Some(stream), true) => TileContent::Video {
                stream: stream.clone(),
                muted_playback: participant.is_local,
            },
            _ if participant.camera_off => TileContent::CameraOff {
                initial: participant.initial(),
            },
            (Some(stream), false) => TileContent::Video {
                stream: stream.clone(),
                muted_playback: participant.is_local,
            },
            (None, true) => TileContent::SharingPlaceholder {
                caption: format!("{} is sharing screen", participant.name),
            },
            (None, false) => TileContent::Avatar {
                initial: participant.initial(),
            },
        };

        Self {
            participant_id: participant.id.clone(),
            label: participant.display_label(),
            content,
            mic: if participant.muted {
                MicIndicator::Muted
            } else {
                MicIndicator::Live
            },
            local_badge: participant.is_local,
            sharing_badge: participant.screen_sharing,
        }
    }

    /// Stream rendered by this tile, if any
    pub fn stream(&self) -> Option<&MediaStream> {
        match &self.content {
            TileContent::Video { stream, .. } => Some(stream),
            _ => None,
        }
    }
}

/// Participants laid out in a grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Column count
    pub columns: usize,
    /// Row count
    pub rows: usize,
    /// Tiles in row-major order
    pub tiles: Vec<Tile>,
}

impl GridLayout {
    /// Lay out participants in order
    pub fn build(participants: &[Participant]) -> Self {
        let columns = grid_columns(participants.len());
        let rows = participants.len().div_ceil(columns).max(1);
        Self {
            columns,
            rows,
            tiles: participants.iter().map(Tile::for_participant).collect(),
        }
    }
}
