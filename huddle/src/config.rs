//! Configuration types and defaults

use crate::{HuddleError, HuddleResult};
use serde::{Deserialize, Serialize};

/// Global Huddle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Enable debug logging
    pub debug_logging: bool,
    /// `tracing` filter used when debug logging is enabled
    pub log_filter: String,
    /// Ask for system audio along with screen shares
    pub screen_share_audio: bool,
    /// Static remote participants shown next to the local user
    pub placeholder_participants: Vec<PlaceholderParticipant>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_filter: "info".to_string(),
            screen_share_audio: true,
            placeholder_participants: vec![PlaceholderParticipant::default()],
        }
    }
}

impl GlobalConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> HuddleResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| HuddleError::Configuration {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> HuddleResult<()> {
        if self.log_filter.trim().is_empty() {
            return Err(HuddleError::Configuration {
                reason: "log_filter must not be empty".to_string(),
            });
        }
        if let Some(index) = self
            .placeholder_participants
            .iter()
            .position(|p| p.name.trim().is_empty())
        {
            return Err(HuddleError::Configuration {
                reason: format!("placeholder participant {} has no name", index),
            });
        }
        Ok(())
    }
}

/// A remote participant with no stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderParticipant {
    /// Display name
    pub name: String,
    /// Shown with the muted indicator
    pub muted: bool,
    /// Shown with the camera-off placeholder
    pub camera_off: bool,
}

impl Default for PlaceholderParticipant {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            muted: false,
            camera_off: false,
        }
    }
}
