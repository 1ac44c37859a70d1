//! Game state and core simulation types
//!
//! Everything a live round needs lives in [`GameState`]; the session owns
//! one per round and drops it when the round ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::metrics::{GameMetrics, MetricsAggregator};
use super::schedule::SpawnScheduler;
use crate::config::GameConfig;
use crate::consts::*;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Config editable, no bubbles exist
    #[default]
    Setup,
    /// Bubbles simulated, input active, timer counting down
    Playing,
    /// Final metrics frozen, waiting for reset
    Completed,
}

/// Bubble colour palette (rainbow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl BubbleColor {
    pub const PALETTE: [BubbleColor; 7] = [
        BubbleColor::Red,
        BubbleColor::Orange,
        BubbleColor::Yellow,
        BubbleColor::Green,
        BubbleColor::Blue,
        BubbleColor::Indigo,
        BubbleColor::Violet,
    ];

    /// RGB components (0-255)
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            BubbleColor::Red => (255, 0, 0),
            BubbleColor::Orange => (255, 127, 0),
            BubbleColor::Yellow => (255, 255, 0),
            BubbleColor::Green => (0, 255, 0),
            BubbleColor::Blue => (0, 0, 255),
            BubbleColor::Indigo => (75, 0, 130),
            BubbleColor::Violet => (148, 0, 211),
        }
    }
}

/// A bubble entity (target or decoy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    /// Drawn radius, also the hit radius
    pub radius: f32,
    /// Velocity in px/ms
    pub vel: Vec2,
    pub text: String,
    pub icon: String,
    pub color: BubbleColor,
    /// Fixed at creation
    pub is_target: bool,
    /// Creation timestamp (ms)
    pub birth: f64,
    /// Opacity, a pure function of age
    pub alpha: f32,
}

impl Bubble {
    /// Age at `now` (ms), never negative
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        (now - self.birth).max(0.0)
    }

    /// True once the bubble has lived its full lifespan
    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) >= BUBBLE_MAX_AGE_MS
    }

    /// Recompute fade-in opacity from age
    pub fn update_alpha(&mut self, now: f64) {
        self.alpha = fade_alpha(self.age(now));
    }
}

/// Opacity for a bubble of the given age: linear fade-in, then fully opaque
#[inline]
pub fn fade_alpha(age_ms: f64) -> f32 {
    (age_ms / BUBBLE_FADE_IN_MS).clamp(0.0, 1.0) as f32
}

/// Play area in screen space
///
/// Bubbles stay inside the inner rectangle left after removing the HUD
/// margins. Degenerate sizes are grown so the inner rectangle never inverts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayBounds {
    pub width: f32,
    pub height: f32,
}

impl PlayBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(2.0 * MARGIN_SIDE),
            height: height.max(MARGIN_TOP + MARGIN_BOTTOM),
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        MARGIN_SIDE
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.width - MARGIN_SIDE
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        MARGIN_TOP
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.height - MARGIN_BOTTOM
    }

    /// Is `pos` inside the margin-adjusted rectangle (inclusive)?
    pub fn contains(&self, pos: Vec2) -> bool {
        (self.min_x()..=self.max_x()).contains(&pos.x)
            && (self.min_y()..=self.max_y()).contains(&pos.y)
    }
}

impl Default for PlayBounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Fire-and-forget notifications for audio/haptics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStart,
    AmbientLoopStart,
    TargetHit,
    /// Decoy hit or empty click
    Miss,
    AmbientLoopStop,
    RoundComplete,
}

/// Live round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the round RNG was created from
    pub seed: u64,
    /// Round RNG (positions, sizes, classification, drift)
    pub rng: Pcg32,
    /// Generation token; deferred work from other rounds is ignored
    pub round_id: u64,
    /// Whether the round still accepts mutation
    pub active: bool,
    /// Name shown on target bubbles
    pub player_name: String,
    /// Icon glyph shown on target bubbles
    pub player_icon: String,
    /// Live population to maintain
    pub target_population: usize,
    /// Round length (ms)
    pub total_ms: f64,
    /// Round start timestamp (ms)
    pub start_ms: f64,
    /// Timestamp of the previous tick (ms)
    pub last_tick_ms: f64,
    /// Difficulty multiplier applied on the last tick
    pub speed_multiplier: f32,
    pub bounds: PlayBounds,
    /// Live bubbles in z-order (last drawn on top)
    pub bubbles: Vec<Bubble>,
    pub metrics: GameMetrics,
    pub aggregator: MetricsAggregator,
    /// Pending replacement spawns
    pub scheduler: SpawnScheduler,
    /// Events not yet drained by the driver
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an empty round. Call [`super::spawn::spawn_initial`] to populate it.
    pub fn new(config: &GameConfig, bounds: PlayBounds, seed: u64, round_id: u64, now: f64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round_id,
            active: true,
            player_name: config.player_name.trim().to_string(),
            player_icon: config.icon_glyph().to_string(),
            target_population: config.target_population(),
            total_ms: config.total_ms(),
            start_ms: now,
            last_tick_ms: now,
            speed_multiplier: 1.0,
            bounds,
            bubbles: Vec::new(),
            metrics: GameMetrics::default(),
            aggregator: MetricsAggregator::default(),
            scheduler: SpawnScheduler::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Time since the round started (ms)
    #[inline]
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        (now - self.start_ms).max(0.0)
    }

    /// Time left on the clock (ms)
    #[inline]
    pub fn remaining_ms(&self, now: f64) -> f64 {
        (self.total_ms - self.elapsed_ms(now)).max(0.0)
    }

    /// Is at least one target on screen?
    pub fn has_live_target(&self) -> bool {
        self.bubbles.iter().any(|b| b.is_target)
    }

    /// Queue an event for the driver
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Stop the round: discard bubbles and cancel deferred spawns
    pub fn finish(&mut self) {
        self.active = false;
        self.bubbles.clear();
        self.scheduler.cancel_round(self.round_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble_born_at(birth: f64) -> Bubble {
        Bubble {
            id: 1,
            pos: Vec2::new(200.0, 200.0),
            radius: 30.0,
            vel: Vec2::ZERO,
            text: "Sun".into(),
            icon: "🌞".into(),
            color: BubbleColor::Red,
            is_target: false,
            birth,
            alpha: 0.0,
        }
    }

    #[test]
    fn test_fade_alpha_curve() {
        assert_eq!(fade_alpha(0.0), 0.0);
        assert!((fade_alpha(200.0) - 0.5).abs() < 1e-6);
        assert_eq!(fade_alpha(400.0), 1.0);
        assert_eq!(fade_alpha(1500.0), 1.0);
        assert_eq!(fade_alpha(-50.0), 0.0);
    }

    #[test]
    fn test_bubble_expiry() {
        let bubble = bubble_born_at(1000.0);
        assert!(!bubble.is_expired(2999.0));
        assert!(bubble.is_expired(3000.0));
        assert_eq!(bubble.age(500.0), 0.0);
    }

    #[test]
    fn test_play_bounds_margins() {
        let bounds = PlayBounds::new(800.0, 600.0);
        assert_eq!(bounds.min_x(), 60.0);
        assert_eq!(bounds.max_x(), 740.0);
        assert_eq!(bounds.min_y(), 80.0);
        assert_eq!(bounds.max_y(), 500.0);
        assert!(bounds.contains(Vec2::new(60.0, 80.0)));
        assert!(!bounds.contains(Vec2::new(59.0, 300.0)));
    }

    #[test]
    fn test_play_bounds_never_invert() {
        let bounds = PlayBounds::new(10.0, 10.0);
        assert!(bounds.min_x() <= bounds.max_x());
        assert!(bounds.min_y() <= bounds.max_y());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let config = GameConfig {
            player_name: "Ada".into(),
            ..Default::default()
        };
        let mut state = GameState::new(&config, PlayBounds::default(), 7, 1, 0.0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert_eq!(state.player_icon, "🐝");
    }
}
