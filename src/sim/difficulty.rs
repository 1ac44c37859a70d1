//! Difficulty ramp
//!
//! Bubble speed grows linearly over the round, from 1x at the start to
//! `1 + SPEED_RAMP` at the final whistle.

use crate::consts::SPEED_RAMP;

/// Speed multiplier for the given point in the round
pub fn speed_multiplier(elapsed_ms: f64, total_ms: f64) -> f32 {
    // A zero-length round is already over
    let progress = if total_ms > 0.0 {
        (elapsed_ms / total_ms).clamp(0.0, 1.0)
    } else {
        1.0
    };
    1.0 + SPEED_RAMP * progress as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(speed_multiplier(0.0, 1000.0), 1.0);
        assert!((speed_multiplier(500.0, 1000.0) - 2.5).abs() < 1e-6);
        assert_eq!(speed_multiplier(1000.0, 1000.0), 4.0);
    }

    #[test]
    fn test_ramp_clamps() {
        assert_eq!(speed_multiplier(5000.0, 1000.0), 4.0);
        assert_eq!(speed_multiplier(-10.0, 1000.0), 1.0);
        assert_eq!(speed_multiplier(0.0, 0.0), 4.0);
    }

    proptest! {
        #[test]
        fn prop_multiplier_in_range(elapsed in 0.0f64..1e7, total in 1.0f64..1e6) {
            let m = speed_multiplier(elapsed, total);
            prop_assert!((1.0..=4.0).contains(&m));
        }
    }
}
