//! Pointer hit testing and wall bouncing
//!
//! Bubbles are circles; the pointer hits a bubble when it lands inside or on
//! its radius. Walls are the margin-adjusted edges of the play area.

use glam::Vec2;

use super::state::{Bubble, PlayBounds};
use crate::point_in_circle;

/// Index of the topmost bubble under `point`
///
/// Later bubbles are drawn over earlier ones, so the search runs back to
/// front and the most recently spawned bubble wins on overlap.
pub fn pick_topmost(bubbles: &[Bubble], point: Vec2) -> Option<usize> {
    bubbles
        .iter()
        .rposition(|b| point_in_circle(point, b.pos, b.radius))
}

/// Result of resolving one axis against its walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounce {
    pub pos: f32,
    pub vel: f32,
    pub hit: bool,
}

/// Keep a circle's leading edge within `[lo, hi]` on one axis
///
/// On contact the centre is clamped back and the velocity turned inward.
/// If the band is narrower than the circle the centre is parked midway.
pub fn bounce_axis(pos: f32, vel: f32, radius: f32, lo: f32, hi: f32) -> AxisBounce {
    let min_center = lo + radius;
    let max_center = hi - radius;

    if min_center > max_center {
        return AxisBounce {
            pos: (lo + hi) * 0.5,
            vel,
            hit: true,
        };
    }
    if pos < min_center {
        AxisBounce {
            pos: min_center,
            vel: vel.abs(),
            hit: true,
        }
    } else if pos > max_center {
        AxisBounce {
            pos: max_center,
            vel: -vel.abs(),
            hit: true,
        }
    } else {
        AxisBounce {
            pos,
            vel,
            hit: false,
        }
    }
}

/// Bounce a bubble off the play-area walls. Returns true on contact.
pub fn bubble_wall_collision(bubble: &mut Bubble, bounds: &PlayBounds) -> bool {
    let x = bounce_axis(
        bubble.pos.x,
        bubble.vel.x,
        bubble.radius,
        bounds.min_x(),
        bounds.max_x(),
    );
    let y = bounce_axis(
        bubble.pos.y,
        bubble.vel.y,
        bubble.radius,
        bounds.min_y(),
        bounds.max_y(),
    );
    bubble.pos = Vec2::new(x.pos, y.pos);
    bubble.vel = Vec2::new(x.vel, y.vel);
    x.hit || y.hit
}
