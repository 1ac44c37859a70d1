//! End-of-round summary
//!
//! Read-only snapshot of config and metrics handed to the results screen
//! and to export.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::GameMetrics;

/// Players younger than this get the "young" message set
pub const YOUNG_AGE_LIMIT: u32 = 12;

const YOUNG_MESSAGES: [&str; 7] = [
    "Curious explorer! You love trying everything.",
    "Bright spark! Your energy lights up the game.",
    "Steady star! You keep going with great focus.",
    "Playful adventurer! You dive into the fun.",
    "Quick learner! You're catching on fast.",
    "Joyful jumper! You make every pop count.",
    "Bouncy buddy! Your enthusiasm is awesome.",
];

const OLDER_MESSAGES: [&str; 7] = [
    "Sharp strategist! You plan your moves well.",
    "Lightning leader! Your speed is impressive.",
    "Focused force! Your precision stands out.",
    "Bold blaster! You tackle challenges head-on.",
    "Steady striker! You maintain great control.",
    "Dynamic driver! Your energy powers through.",
    "Resilient racer! You keep pushing forward.",
];

/// CSV header for exported results
pub const CSV_HEADER: &str = "Name,Icon,Hits,Misses,Accuracy,AvgRT,BestStreak,TPM";

/// Frozen results of a completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub config: GameConfig,
    pub metrics: GameMetrics,
}

impl ResultsSnapshot {
    pub fn new(config: GameConfig, metrics: GameMetrics) -> Self {
        Self { config, metrics }
    }

    /// Encouraging message whose tone depends on the player's age
    pub fn personality_message<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        let messages = if self.config.clamped_age() < YOUNG_AGE_LIMIT {
            &YOUNG_MESSAGES
        } else {
            &OLDER_MESSAGES
        };
        messages.choose(rng).copied().unwrap_or(messages[0])
    }

    /// Header plus one record
    pub fn to_csv(&self) -> String {
        let m = &self.metrics;
        format!(
            "{CSV_HEADER}\n{},{},{},{},{:.2},{:.0},{},{:.2}",
            csv_field(&self.config.player_name),
            csv_field(&self.config.icon),
            m.hits,
            m.misses,
            m.derived.accuracy,
            m.derived.avg_reaction_time,
            m.best_streak,
            m.derived.targets_per_minute,
        )
    }

    /// Suggested download name
    pub fn csv_file_name(&self) -> String {
        format!("{}-bubble-results.csv", self.config.player_name.trim())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Quote a CSV field when it contains separators or quotes
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
