//! Per-frame simulation step and click resolution
//!
//! Both run on the driver's thread and borrow the same [`GameState`]; a click
//! that lands between two ticks mutates the bubble list the next tick sees.

use glam::Vec2;
use rand::Rng;

use super::collision::{bubble_wall_collision, pick_topmost};
use super::difficulty::speed_multiplier;
use super::spawn::{spawn_with_policy, top_up};
use super::state::{Bubble, GameEvent, GameState};
use crate::consts::*;

/// What a tick decided about the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Round continues
    Running,
    /// Timer ran out; the round has been finished
    Expired,
    /// Round was already finished; nothing happened
    Inactive,
}

/// Outcome of a pointer action
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Popped a target, with the birth-to-click time (ms)
    TargetHit { bubble: Bubble, reaction_ms: f64 },
    /// Popped a decoy
    DecoyHit { bubble: Bubble },
    /// Clicked empty space
    Miss,
}

impl ClickOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, ClickOutcome::TargetHit { .. })
    }
}

/// Advance the round to `now`
///
/// Order: expiry check, difficulty, prune, deferred replacements, population
/// top-up, physics, rate-limited metrics.
pub fn tick(state: &mut GameState, now: f64) -> TickStatus {
    if !state.active {
        return TickStatus::Inactive;
    }

    let dt = (now - state.last_tick_ms).clamp(0.0, MAX_FRAME_DT_MS) as f32;
    state.last_tick_ms = now;

    let elapsed = state.elapsed_ms(now);
    if elapsed >= state.total_ms {
        let total = state.total_ms;
        state.aggregator.recompute(&mut state.metrics, now, total);
        state.finish();
        state.emit(GameEvent::AmbientLoopStop);
        state.emit(GameEvent::RoundComplete);
        return TickStatus::Expired;
    }

    state.speed_multiplier = speed_multiplier(elapsed, state.total_ms);

    // Stale bubbles must go before top-up so they don't block respawn
    state.bubbles.retain(|b| !b.is_expired(now));

    let due = state.scheduler.take_due(now, state.round_id);
    for _ in 0..due {
        spawn_with_policy(state, now);
    }

    top_up(state, now);

    let scale = dt * state.speed_multiplier;
    for bubble in &mut state.bubbles {
        bubble.pos += bubble.vel * scale;
        bubble.vel.x = drift(&mut state.rng, bubble.vel.x);
        bubble_wall_collision(bubble, &state.bounds);
        bubble.update_alpha(now);
    }

    state
        .aggregator
        .maybe_recompute(&mut state.metrics, now, elapsed);

    TickStatus::Running
}

/// Small zero-mean nudge to horizontal speed, capped so it can't run away
fn drift<R: Rng + ?Sized>(rng: &mut R, vx: f32) -> f32 {
    let nudge = rng.random_range(-DRIFT_STEP..=DRIFT_STEP);
    (vx + nudge).clamp(-DRIFT_MAX_VX, DRIFT_MAX_VX)
}

/// Resolve a pointer action at `point`
///
/// Every call counts as a tap. The topmost bubble under the pointer is
/// removed; a target hit schedules a delayed replacement.
pub fn resolve_click(state: &mut GameState, point: Vec2, now: f64) -> ClickOutcome {
    state.metrics.taps += 1;

    let Some(index) = pick_topmost(&state.bubbles, point) else {
        state.metrics.record_miss();
        state.emit(GameEvent::Miss);
        return ClickOutcome::Miss;
    };

    let bubble = state.bubbles.remove(index);
    if bubble.is_target {
        let reaction_ms = now - bubble.birth;
        state.metrics.record_hit(reaction_ms);
        state
            .scheduler
            .schedule(now + REPLACEMENT_DELAY_MS, state.round_id);
        state.emit(GameEvent::TargetHit);
        log::debug!("Target #{} popped in {:.0} ms", bubble.id, reaction_ms);
        ClickOutcome::TargetHit {
            bubble,
            reaction_ms,
        }
    } else {
        state.metrics.record_miss();
        state.emit(GameEvent::Miss);
        log::debug!("Decoy #{} popped", bubble.id);
        ClickOutcome::DecoyHit { bubble }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::spawn::spawn_initial;
    use crate::sim::state::{BubbleColor, PlayBounds};
    use proptest::prelude::*;

    fn new_round(bubble_count: u32, game_time_secs: u32, seed: u64) -> GameState {
        let config = GameConfig {
            player_name: "Ada".into(),
            bubble_count,
            game_time_secs,
            ..Default::default()
        };
        let mut state = GameState::new(&config, PlayBounds::new(1024.0, 768.0), seed, 1, 0.0);
        spawn_initial(&mut state, 0.0);
        state
    }

    fn placed(id: u32, x: f32, y: f32, radius: f32, is_target: bool, birth: f64) -> Bubble {
        Bubble {
            id,
            pos: Vec2::new(x, y),
            radius,
            vel: Vec2::ZERO,
            text: String::new(),
            icon: String::new(),
            color: BubbleColor::Blue,
            is_target,
            birth,
            alpha: 1.0,
        }
    }

    #[test]
    fn test_tick_maintains_population() {
        let mut state = new_round(7, 45, 1);
        state.bubbles.truncate(2);
        assert_eq!(tick(&mut state, 16.0), TickStatus::Running);
        assert_eq!(state.bubbles.len(), 7);
    }

    #[test]
    fn test_tick_prunes_old_bubbles() {
        let mut state = new_round(3, 45, 2);
        let original: Vec<u32> = state.bubbles.iter().map(|b| b.id).collect();
        tick(&mut state, 2000.0);
        assert_eq!(state.bubbles.len(), 3);
        assert!(state.bubbles.iter().all(|b| !original.contains(&b.id)));
    }

    #[test]
    fn test_tick_expires_round() {
        let mut state = new_round(5, 1, 3);
        state.scheduler.schedule(1100.0, state.round_id);
        assert_eq!(tick(&mut state, 999.0), TickStatus::Running);
        assert_eq!(tick(&mut state, 1000.0), TickStatus::Expired);
        assert!(state.bubbles.is_empty());
        assert!(state.scheduler.is_empty());
        assert!(!state.active);
        assert_eq!(
            state.events.last().copied(),
            Some(GameEvent::RoundComplete)
        );
        assert_eq!(tick(&mut state, 1016.0), TickStatus::Inactive);
        assert!(state.bubbles.is_empty());
    }

    #[test]
    fn test_tick_sets_speed_multiplier() {
        let mut state = new_round(3, 1, 4);
        tick(&mut state, 500.0);
        assert!((state.speed_multiplier - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_alpha_follows_age() {
        let mut state = new_round(2, 45, 5);
        tick(&mut state, 100.0);
        for b in &state.bubbles {
            assert!((b.alpha - 0.25).abs() < 1e-6);
        }
        tick(&mut state, 450.0);
        for b in &state.bubbles {
            assert_eq!(b.alpha, 1.0);
        }
    }

    #[test]
    fn test_movement_scaled_by_dt_and_multiplier() {
        let mut state = new_round(0, 10, 6);
        state.target_population = 1;
        let mut b = placed(99, 500.0, 400.0, 30.0, true, 0.0);
        b.vel = Vec2::new(0.0, 0.02);
        state.bubbles.push(b);
        // 5 s into a 10 s round: multiplier 2.5, dt clamped to 100 ms
        state.last_tick_ms = 4990.0;
        state.bubbles[0].birth = 4000.0;
        tick(&mut state, 5000.0);
        assert!((state.bubbles[0].pos.y - (400.0 + 0.02 * 10.0 * 2.5)).abs() < 1e-3);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = new_round(0, 60, 7);
        state.target_population = 1;
        let mut b = placed(99, 500.0, 300.0, 30.0, true, 0.0);
        b.vel = Vec2::new(0.0, 0.02);
        state.bubbles.push(b);
        tick(&mut state, 1000.0);
        let moved = state.bubbles[0].pos.y - 300.0;
        let max_expected = 0.02 * MAX_FRAME_DT_MS as f32 * state.speed_multiplier;
        assert!(moved <= max_expected + 1e-3);
    }

    #[test]
    fn test_drift_is_bounded() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(8);
        let mut vx = 0.0;
        for _ in 0..100_000 {
            vx = drift(&mut rng, vx);
            assert!(vx.abs() <= DRIFT_MAX_VX);
        }
    }

    #[test]
    fn test_click_target_hit() {
        let mut state = new_round(0, 45, 9);
        state.bubbles.push(placed(1, 300.0, 300.0, 40.0, true, 100.0));
        let outcome = resolve_click(&mut state, Vec2::new(310.0, 300.0), 450.0);
        assert!(outcome.is_hit());
        match outcome {
            ClickOutcome::TargetHit { bubble, reaction_ms } => {
                assert_eq!(bubble.id, 1);
                assert_eq!(reaction_ms, 350.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(state.bubbles.is_empty());
        assert_eq!(state.metrics.hits, 1);
        assert_eq!(state.metrics.taps, 1);
        assert_eq!(state.metrics.streak, 1);
        assert_eq!(state.metrics.best_streak, 1);
        assert_eq!(state.metrics.reaction_times, vec![350.0]);
        assert_eq!(state.scheduler.len(), 1);
        assert_eq!(state.events, vec![GameEvent::TargetHit]);
    }

    #[test]
    fn test_click_decoy_hit() {
        let mut state = new_round(0, 45, 10);
        state.metrics.streak = 3;
        state.metrics.best_streak = 3;
        state.metrics.hits = 3;
        state.bubbles.push(placed(1, 300.0, 300.0, 40.0, false, 0.0));
        let outcome = resolve_click(&mut state, Vec2::new(300.0, 300.0), 100.0);
        assert!(matches!(outcome, ClickOutcome::DecoyHit { .. }));
        assert!(state.bubbles.is_empty());
        assert_eq!(state.metrics.misses, 1);
        assert_eq!(state.metrics.streak, 0);
        assert_eq!(state.metrics.best_streak, 3);
        assert_eq!(state.metrics.hits, 3);
        assert_eq!(state.metrics.taps, 1);
        assert!(state.scheduler.is_empty());
        assert_eq!(state.events, vec![GameEvent::Miss]);
    }

    #[test]
    fn test_click_miss_keeps_bubbles() {
        let mut state = new_round(0, 45, 11);
        state.bubbles.push(placed(1, 300.0, 300.0, 40.0, true, 0.0));
        let outcome = resolve_click(&mut state, Vec2::new(700.0, 500.0), 100.0);
        assert_eq!(outcome, ClickOutcome::Miss);
        assert_eq!(state.bubbles.len(), 1);
        assert_eq!(state.metrics.misses, 1);
        assert_eq!(state.metrics.taps, 1);
    }

    #[test]
    fn test_click_overlap_picks_most_recent() {
        let mut state = new_round(0, 45, 12);
        state.bubbles.push(placed(1, 300.0, 300.0, 50.0, true, 0.0));
        state.bubbles.push(placed(2, 320.0, 300.0, 50.0, false, 0.0));
        let outcome = resolve_click(&mut state, Vec2::new(310.0, 300.0), 100.0);
        match outcome {
            ClickOutcome::DecoyHit { bubble } => assert_eq!(bubble.id, 2),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(state.bubbles[0].id, 1);
    }

    #[test]
    fn test_replacement_spawn_after_delay() {
        let mut state = new_round(0, 45, 13);
        state.bubbles.push(placed(1, 300.0, 300.0, 40.0, true, 0.0));
        resolve_click(&mut state, Vec2::new(300.0, 300.0), 100.0);
        let spawns_before = state.metrics.target_spawns;

        tick(&mut state, 250.0);
        assert!(state.bubbles.is_empty());

        tick(&mut state, 300.0);
        assert_eq!(state.bubbles.len(), 1);
        // No target was live, so the replacement had to be one
        assert!(state.bubbles[0].is_target);
        assert_eq!(state.metrics.target_spawns, spawns_before + 1);
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_replacement_cancelled_when_round_ends() {
        let mut state = new_round(0, 45, 14);
        state.bubbles.push(placed(1, 300.0, 300.0, 40.0, true, 0.0));
        resolve_click(&mut state, Vec2::new(300.0, 300.0), 100.0);
        state.finish();
        tick(&mut state, 400.0);
        assert!(state.bubbles.is_empty());
        assert!(state.scheduler.is_empty());
    }

    proptest! {
        #[test]
        fn prop_bubbles_stay_in_bounds(
            seed in any::<u64>(),
            count in 0u32..25,
            width in 100.0f32..2000.0,
            height in 150.0f32..1500.0,
            frames in proptest::collection::vec(0.0f64..150.0, 1..60),
        ) {
            let config = GameConfig {
                player_name: "Ada".into(),
                bubble_count: count,
                ..Default::default()
            };
            let bounds = PlayBounds::new(width, height);
            let mut state = GameState::new(&config, bounds, seed, 1, 0.0);
            spawn_initial(&mut state, 0.0);
            let mut now = 0.0;
            for dt in frames {
                now += dt;
                tick(&mut state, now);
                for b in &state.bubbles {
                    prop_assert!(bounds.contains(b.pos), "{:?} escaped {:?}", b.pos, bounds);
                    prop_assert!((0.0..=1.0).contains(&b.alpha));
                }
            }
        }

        #[test]
        fn prop_best_streak_never_below_streak(
            seed in any::<u64>(),
            clicks in proptest::collection::vec((60.0f32..964.0, 80.0f32..668.0), 1..80),
        ) {
            let mut state = new_round(12, 45, seed);
            let mut now = 0.0;
            for (x, y) in clicks {
                now += 50.0;
                tick(&mut state, now);
                resolve_click(&mut state, Vec2::new(x, y), now);
                prop_assert!(state.metrics.best_streak >= state.metrics.streak);
                prop_assert_eq!(state.metrics.taps, state.metrics.hits + state.metrics.misses);
            }
        }

        #[test]
        fn prop_spawn_forces_target_when_none_live(seed in any::<u64>(), count in 1u32..25) {
            let mut state = new_round(count, 45, seed);
            state.bubbles.retain(|b| !b.is_target);
            state.bubbles.pop();
            let before = state.bubbles.len();
            spawn_with_policy(&mut state, 0.0);
            prop_assert!(state.bubbles[before].is_target);
        }
    }
}
