//! Player setup: the parameters chosen before a round
//!
//! Read-only while a round is playing. Numeric fields are never rejected;
//! the accessors clamp them into playable ranges instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BUBBLE_COUNT, MAX_GAME_TIME_SECS, MAX_PLAYER_AGE, MIN_PLAYER_AGE};
use crate::error::{ConfigError, SessionError};

/// Icons offered on the setup screen ("glyph Label")
pub const ICON_OPTIONS: [&str; 12] = [
    "🐝 Bee",
    "🌞 Sun",
    "🌟 Star",
    "🍀 Clover",
    "🐾 Paw",
    "🐦 Bird",
    "✨ Sparkle",
    "🌈 Rainbow",
    "⭐ Star",
    "🐬 Dolphin",
    "🦋 Butterfly",
    "🌻 Flower",
];

/// User-chosen round parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Shown on every target bubble; must be non-blank to start
    pub player_name: String,
    /// Icon label, e.g. "🐝 Bee"
    pub icon: String,
    /// Round length in seconds
    pub game_time_secs: u32,
    /// Live bubble population to maintain
    pub bubble_count: u32,
    /// Only selects the tone of the results message
    pub player_age: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            icon: ICON_OPTIONS[0].to_string(),
            game_time_secs: 45,
            bubble_count: 7,
            player_age: 5,
        }
    }
}

impl GameConfig {
    /// Check the config can start a round
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.player_name.trim().is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        Ok(())
    }

    /// Glyph part of the icon label ("🐝 Bee" -> "🐝")
    pub fn icon_glyph(&self) -> &str {
        self.icon.split(' ').next().unwrap_or_default()
    }

    /// Round length in milliseconds (zero-length rounds end on the first tick)
    pub fn total_ms(&self) -> f64 {
        f64::from(self.game_time_secs.min(MAX_GAME_TIME_SECS)) * 1000.0
    }

    /// Bubble population, capped so the screen stays readable
    pub fn target_population(&self) -> usize {
        self.bubble_count.min(MAX_BUBBLE_COUNT) as usize
    }

    /// Age clamped into the supported range
    pub fn clamped_age(&self) -> u32 {
        self.player_age.clamp(MIN_PLAYER_AGE, MAX_PLAYER_AGE)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
