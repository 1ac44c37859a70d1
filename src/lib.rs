//! Bubble Pop - A reaction-time bubble popping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, hit testing, metrics)
//! - `session`: Round state machine and snapshot broadcasting
//! - `platform`: Clock abstraction (native/browser)
//! - `renderer`: Bubble styling and canvas drawing
//! - `audio`: Event-driven sound effects
//! - `config` / `settings`: Player setup and preferences
//! - `results`: End-of-round summary and export

pub mod audio;
pub mod config;
pub mod demo;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod results;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, SessionError};
pub use results::ResultsSnapshot;
pub use session::{Session, SessionSnapshot};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Screen space reserved for the top HUD (px)
    pub const MARGIN_TOP: f32 = 80.0;
    /// Screen space reserved for the stats bar (px)
    pub const MARGIN_BOTTOM: f32 = 100.0;
    /// Left/right screen margin (px)
    pub const MARGIN_SIDE: f32 = 60.0;

    /// Bubble radius range (px)
    pub const BUBBLE_MIN_RADIUS: f32 = 28.0;
    pub const BUBBLE_MAX_RADIUS: f32 = 60.0;

    /// Initial horizontal speed range, ± (px/ms)
    pub const BUBBLE_MAX_VX: f32 = 0.08;
    /// Initial vertical speed range, ± (px/ms). Kept at a quarter of horizontal.
    pub const BUBBLE_MAX_VY: f32 = 0.02;
    /// Per-tick horizontal drift nudge, ± (px/ms)
    pub const DRIFT_STEP: f32 = 0.001;
    /// Drift can never push horizontal speed beyond this (px/ms)
    pub const DRIFT_MAX_VX: f32 = 0.12;

    /// Bubbles older than this are pruned (ms)
    pub const BUBBLE_MAX_AGE_MS: f64 = 2000.0;
    /// Fade-in window (ms)
    pub const BUBBLE_FADE_IN_MS: f64 = 400.0;

    /// Delay before a popped target is replaced (ms)
    pub const REPLACEMENT_DELAY_MS: f64 = 200.0;
    /// Minimum interval between derived metric recomputes (ms)
    pub const METRICS_INTERVAL_MS: f64 = 100.0;
    /// Largest frame delta fed to physics (ms)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;

    /// Share of the opening population that are targets (rounded up)
    pub const INITIAL_TARGET_FRACTION: f32 = 0.4;
    /// Speed multiplier gained over a full round (1x -> 4x)
    pub const SPEED_RAMP: f32 = 3.0;

    /// Longest allowed round (seconds)
    pub const MAX_GAME_TIME_SECS: u32 = 180;
    /// Upper bound on the live bubble population
    pub const MAX_BUBBLE_COUNT: u32 = 25;
    /// Player age bounds
    pub const MIN_PLAYER_AGE: u32 = 1;
    pub const MAX_PLAYER_AGE: u32 = 18;
}

/// Euclidean distance test: is `point` inside (or on) the circle?
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Map `t` in [0, 1] onto `[min, max]`
#[inline]
pub fn lerp_range(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}
