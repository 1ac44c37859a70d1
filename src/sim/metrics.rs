//! Session statistics
//!
//! Raw counters are written by the click resolver and the spawner; the
//! derived fields are pure functions of those counters and are refreshed by
//! [`MetricsAggregator`] at most once per [`METRICS_INTERVAL_MS`].

use serde::{Deserialize, Serialize};

use crate::consts::METRICS_INTERVAL_MS;

/// Statistics derived from the raw counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Hits as a percentage of all taps
    pub accuracy: f64,
    /// Mean target reaction time (ms)
    pub avg_reaction_time: f64,
    /// Target bubbles created per minute of play
    pub targets_per_minute: f64,
}

impl DerivedMetrics {
    /// Compute derived statistics. Empty denominators yield 0, never NaN/inf.
    pub fn compute(metrics: &GameMetrics, elapsed_ms: f64) -> Self {
        Self {
            accuracy: accuracy(metrics.hits, metrics.taps),
            avg_reaction_time: mean(&metrics.reaction_times),
            targets_per_minute: targets_per_minute(metrics.target_spawns, elapsed_ms),
        }
    }
}

/// Cumulative round statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameMetrics {
    pub hits: u32,
    pub misses: u32,
    /// Consecutive target hits; any miss resets it
    pub streak: u32,
    pub best_streak: u32,
    /// Target bubbles created this round
    pub target_spawns: u32,
    /// Every pointer action, hit or miss
    pub taps: u32,
    /// Birth-to-pop times of target hits (ms), in click order
    pub reaction_times: Vec<f64>,
    #[serde(flatten)]
    pub derived: DerivedMetrics,
}

impl GameMetrics {
    /// Record a popped target
    pub fn record_hit(&mut self, reaction_ms: f64) {
        self.hits += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        self.reaction_times.push(reaction_ms);
    }

    /// Record a decoy hit or an empty click
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.streak = 0;
    }
}

/// `hits / max(1, taps) * 100`
pub fn accuracy(hits: u32, taps: u32) -> f64 {
    f64::from(hits) / f64::from(taps.max(1)) * 100.0
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Target spawn rate per minute; 0 before any time has elapsed
pub fn targets_per_minute(target_spawns: u32, elapsed_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    let tpm = f64::from(target_spawns) / elapsed_ms.max(1.0) * 60_000.0;
    if tpm.is_finite() { tpm } else { 0.0 }
}

/// Rate-limited recompute of the derived fields
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    last_recompute_ms: Option<f64>,
}

impl MetricsAggregator {
    /// Recompute if the interval has passed. Returns true when metrics changed.
    pub fn maybe_recompute(&mut self, metrics: &mut GameMetrics, now: f64, elapsed_ms: f64) -> bool {
        if let Some(last) = self.last_recompute_ms {
            if now - last <= METRICS_INTERVAL_MS {
                return false;
            }
        }
        self.recompute(metrics, now, elapsed_ms);
        true
    }

    /// Recompute unconditionally (used when the round ends)
    pub fn recompute(&mut self, metrics: &mut GameMetrics, now: f64, elapsed_ms: f64) {
        metrics.derived = DerivedMetrics::compute(metrics, elapsed_ms);
        self.last_recompute_ms = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(4, 10), 40.0);
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(3, 3), 100.0);
    }

    #[test]
    fn test_mean_reaction_time() {
        assert_eq!(mean(&[100.0, 200.0, 300.0]), 200.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_targets_per_minute() {
        assert_eq!(targets_per_minute(12, 60_000.0), 12.0);
        assert_eq!(targets_per_minute(12, 30_000.0), 24.0);
        assert_eq!(targets_per_minute(5, 0.0), 0.0);
        assert_eq!(targets_per_minute(0, 1000.0), 0.0);
    }

    #[test]
    fn test_streak_tracking() {
        let mut m = GameMetrics::default();
        m.record_hit(250.0);
        m.record_hit(300.0);
        assert_eq!(m.streak, 2);
        assert_eq!(m.best_streak, 2);
        m.record_miss();
        assert_eq!(m.streak, 0);
        assert_eq!(m.best_streak, 2);
        m.record_hit(100.0);
        assert_eq!(m.streak, 1);
        assert_eq!(m.best_streak, 2);
        assert_eq!(m.reaction_times, vec![250.0, 300.0, 100.0]);
    }

    #[test]
    fn test_aggregator_rate_limit() {
        let mut agg = MetricsAggregator::default();
        let mut m = GameMetrics {
            hits: 1,
            taps: 2,
            ..Default::default()
        };
        assert!(agg.maybe_recompute(&mut m, 1000.0, 1000.0));
        assert_eq!(m.derived.accuracy, 50.0);

        m.hits = 2;
        assert!(!agg.maybe_recompute(&mut m, 1050.0, 1050.0));
        assert_eq!(m.derived.accuracy, 50.0);
        assert!(!agg.maybe_recompute(&mut m, 1100.0, 1100.0));

        assert!(agg.maybe_recompute(&mut m, 1101.0, 1101.0));
        assert_eq!(m.derived.accuracy, 100.0);
    }

    #[test]
    fn test_spec_scenario_values() {
        let m = GameMetrics {
            hits: 4,
            taps: 10,
            target_spawns: 12,
            reaction_times: vec![100.0, 200.0, 300.0],
            ..Default::default()
        };
        let d = DerivedMetrics::compute(&m, 60_000.0);
        assert_eq!(d.accuracy, 40.0);
        assert_eq!(d.avg_reaction_time, 200.0);
        assert_eq!(d.targets_per_minute, 12.0);
    }

    proptest! {
        #[test]
        fn prop_recompute_is_idempotent(
            hits in 0u32..500,
            extra_taps in 0u32..500,
            spawns in 0u32..1000,
            samples in proptest::collection::vec(0.0f64..5000.0, 0..50),
            elapsed in 0.0f64..200_000.0,
        ) {
            let mut m = GameMetrics {
                hits,
                taps: hits + extra_taps,
                target_spawns: spawns,
                reaction_times: samples,
                ..Default::default()
            };
            let mut agg = MetricsAggregator::default();
            agg.recompute(&mut m, 0.0, elapsed);
            let first = m.derived;
            agg.recompute(&mut m, 500.0, elapsed);
            prop_assert_eq!(first, m.derived);
            prop_assert!(first.accuracy.is_finite() && first.accuracy <= 100.0);
            prop_assert!(first.targets_per_minute.is_finite());
        }
    }
}
