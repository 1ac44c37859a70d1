//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in, never read from a clock
//! - Seeded RNG only
//! - Stable z-order (spawn order) for bubbles
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod metrics;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{bubble_wall_collision, pick_topmost};
pub use difficulty::speed_multiplier;
pub use metrics::{DerivedMetrics, GameMetrics, MetricsAggregator};
pub use schedule::SpawnScheduler;
pub use spawn::{create_bubble, spawn_initial};
pub use state::{Bubble, BubbleColor, GameEvent, GamePhase, GameState, PlayBounds};
pub use tick::{ClickOutcome, TickStatus, resolve_click, tick};
