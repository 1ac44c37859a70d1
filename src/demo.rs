//! Idle mode
//!
//! A scripted player used by the headless native run and as an attract mode
//! in the browser.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::lerp_range;
use crate::sim::{Bubble, PlayBounds};

/// Clicks the oldest visible target once it has been on screen long enough
#[derive(Debug, Clone)]
pub struct Autoplayer {
    reaction_delay_ms: f64,
    misclick_chance: f64,
    last_click_ms: Option<f64>,
    rng: Pcg32,
}

impl Autoplayer {
    pub fn new(reaction_delay_ms: f64, misclick_chance: f64, seed: u64) -> Self {
        Self {
            reaction_delay_ms: reaction_delay_ms.max(0.0),
            misclick_chance: misclick_chance.clamp(0.0, 1.0),
            last_click_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn reaction_delay_ms(&self) -> f64 {
        self.reaction_delay_ms
    }

    /// Where to click this frame, if anywhere.
    ///
    /// Clicks are spaced at least one reaction delay apart. A misclick lands
    /// on a random point of the play area instead of the chosen target.
    pub fn next_click(&mut self, bubbles: &[Bubble], bounds: PlayBounds, now: f64) -> Option<Vec2> {
        if let Some(last) = self.last_click_ms {
            if now - last < self.reaction_delay_ms {
                return None;
            }
        }

        let target = bubbles
            .iter()
            .filter(|b| b.is_target && b.age(now) >= self.reaction_delay_ms)
            .min_by(|a, b| a.birth.total_cmp(&b.birth))?;

        self.last_click_ms = Some(now);
        if self.rng.random_bool(self.misclick_chance) {
            let tx: f32 = self.rng.random();
            let ty: f32 = self.rng.random();
            Some(Vec2::new(
                lerp_range(bounds.min_x(), bounds.max_x(), tx),
                lerp_range(bounds.min_y(), bounds.max_y(), ty),
            ))
        } else {
            Some(target.pos)
        }
    }

    /// Forget click history, e.g. between rounds
    pub fn reset(&mut self) {
        self.last_click_ms = None;
    }
}

impl Default for Autoplayer {
    fn default() -> Self {
        Self::new(450.0, 0.1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BubbleColor;

    fn bubble(id: u32, x: f32, is_target: bool, birth: f64) -> Bubble {
        Bubble {
            id,
            pos: Vec2::new(x, 300.0),
            radius: 30.0,
            vel: Vec2::ZERO,
            text: "Ada".into(),
            icon: "🐝".into(),
            color: BubbleColor::Blue,
            is_target,
            birth,
            alpha: 1.0,
        }
    }

    #[test]
    fn test_waits_for_reaction_delay() {
        let mut player = Autoplayer::new(300.0, 0.0, 1);
        let bubbles = vec![bubble(1, 200.0, true, 1000.0)];
        let bounds = PlayBounds::default();
        assert_eq!(player.next_click(&bubbles, bounds, 1200.0), None);
        assert_eq!(
            player.next_click(&bubbles, bounds, 1300.0),
            Some(Vec2::new(200.0, 300.0))
        );
    }

    #[test]
    fn test_picks_oldest_target_and_ignores_decoys() {
        let mut player = Autoplayer::new(100.0, 0.0, 1);
        let bubbles = vec![
            bubble(1, 100.0, false, 0.0),
            bubble(2, 400.0, true, 500.0),
            bubble(3, 600.0, true, 200.0),
        ];
        let click = player.next_click(&bubbles, PlayBounds::default(), 1000.0);
        assert_eq!(click, Some(Vec2::new(600.0, 300.0)));
    }

    #[test]
    fn test_spaces_clicks() {
        let mut player = Autoplayer::new(200.0, 0.0, 1);
        let bubbles = vec![bubble(1, 200.0, true, 0.0)];
        let bounds = PlayBounds::default();
        assert!(player.next_click(&bubbles, bounds, 1000.0).is_some());
        assert!(player.next_click(&bubbles, bounds, 1100.0).is_none());
        assert!(player.next_click(&bubbles, bounds, 1200.0).is_some());
        player.reset();
        assert!(player.next_click(&bubbles, bounds, 1201.0).is_some());
    }

    #[test]
    fn test_misclick_stays_in_play_area() {
        let mut player = Autoplayer::new(0.0, 1.0, 7);
        let bubbles = vec![bubble(1, 200.0, true, 0.0)];
        let bounds = PlayBounds::default();
        for i in 0..20 {
            player.reset();
            let click = player
                .next_click(&bubbles, bounds, 10.0 * i as f64)
                .unwrap();
            assert!(bounds.contains(click));
        }
    }
}
