//! Bubble factory and spawn policy

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Bubble, BubbleColor, GameState, PlayBounds};
use crate::consts::*;
use crate::lerp_range;

/// Icons shown on decoy bubbles
pub const DECOY_ICONS: [&str; 12] = [
    "🐝", "🌞", "🌟", "🍀", "🐾", "🐦", "✨", "🌈", "⭐", "🐬", "🦋", "🌻",
];

/// Names shown on decoy bubbles
pub const DECOY_NAMES: [&str; 8] = ["Sun", "Sky", "Joy", "Bee", "Kit", "Pip", "Zee", "Mio"];

/// Create a bubble at a random spot inside the play area
///
/// Targets carry the player's name and icon, decoys a random pick from the
/// decoy lists. The bubble starts fully transparent.
pub fn create_bubble<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    is_target: bool,
    bounds: &PlayBounds,
    player_name: &str,
    player_icon: &str,
    now: f64,
) -> Bubble {
    let radius = lerp_range(BUBBLE_MIN_RADIUS, BUBBLE_MAX_RADIUS, rng.random());
    let pos = Vec2::new(
        lerp_range(bounds.min_x(), bounds.max_x(), rng.random()),
        lerp_range(bounds.min_y(), bounds.max_y(), rng.random()),
    );
    let vel = Vec2::new(
        lerp_range(-BUBBLE_MAX_VX, BUBBLE_MAX_VX, rng.random()),
        lerp_range(-BUBBLE_MAX_VY, BUBBLE_MAX_VY, rng.random()),
    );

    let (text, icon) = if is_target {
        (player_name.to_string(), player_icon.to_string())
    } else {
        (
            DECOY_NAMES.choose(rng).copied().unwrap_or_default().to_string(),
            DECOY_ICONS.choose(rng).copied().unwrap_or_default().to_string(),
        )
    };
    let color = BubbleColor::PALETTE
        .choose(rng)
        .copied()
        .unwrap_or(BubbleColor::Blue);

    Bubble {
        id,
        pos,
        radius,
        vel,
        text,
        icon,
        color,
        is_target,
        birth: now,
        alpha: 0.0,
    }
}

/// Classification for the next spawn: forced target when none is live
pub fn next_is_target<R: Rng + ?Sized>(rng: &mut R, has_live_target: bool) -> bool {
    !has_live_target || rng.random_bool(0.5)
}

/// Number of targets in the opening population
pub fn initial_target_count(population: usize) -> usize {
    (population as f32 * INITIAL_TARGET_FRACTION).ceil() as usize
}

/// Add one bubble to the round, counting target spawns
pub fn spawn_bubble(state: &mut GameState, is_target: bool, now: f64) {
    let id = state.next_entity_id();
    let bubble = create_bubble(
        &mut state.rng,
        id,
        is_target,
        &state.bounds,
        &state.player_name,
        &state.player_icon,
        now,
    );
    if is_target {
        state.metrics.target_spawns += 1;
    }
    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}) r={:.0}",
        if is_target { "target" } else { "decoy" },
        id,
        bubble.pos.x,
        bubble.pos.y,
        bubble.radius
    );
    state.bubbles.push(bubble);
}

/// Spawn one bubble using the population classification rule
pub fn spawn_with_policy(state: &mut GameState, now: f64) {
    let has_target = state.has_live_target();
    let is_target = next_is_target(&mut state.rng, has_target);
    spawn_bubble(state, is_target, now);
}

/// Opening population: the first ~40% (rounded up) are targets
pub fn spawn_initial(state: &mut GameState, now: f64) {
    let population = state.target_population;
    let targets = initial_target_count(population);
    for i in 0..population {
        spawn_bubble(state, i < targets, now);
    }
}

/// Spawn until the live count reaches the configured population
pub fn top_up(state: &mut GameState, now: f64) {
    while state.bubbles.len() < state.target_population {
        spawn_with_policy(state, now);
    }
}
