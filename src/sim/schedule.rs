//! Deferred replacement spawns
//!
//! A popped target is replaced after a short delay instead of instantly.
//! Each pending spawn carries the round it was scheduled in; spawns for any
//! other round, or for a round that has finished, are dropped unfired.

use std::collections::VecDeque;

/// A replacement spawn waiting for its due time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawn {
    pub due_ms: f64,
    pub round_id: u64,
}

/// FIFO of pending spawns (due times are non-decreasing)
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    pending: VecDeque<PendingSpawn>,
}

impl SpawnScheduler {
    pub fn schedule(&mut self, due_ms: f64, round_id: u64) {
        self.pending.push_back(PendingSpawn { due_ms, round_id });
    }

    /// Remove every spawn due at `now` and return how many belong to `round_id`
    pub fn take_due(&mut self, now: f64, round_id: u64) -> usize {
        let mut fired = 0;
        while let Some(front) = self.pending.front() {
            if front.due_ms > now {
                break;
            }
            if let Some(spawn) = self.pending.pop_front() {
                if spawn.round_id == round_id {
                    fired += 1;
                } else {
                    log::debug!("Dropping stale spawn from round {}", spawn.round_id);
                }
            }
        }
        fired
    }

    /// Invalidate everything scheduled for `round_id`
    pub fn cancel_round(&mut self, round_id: u64) {
        self.pending.retain(|s| s.round_id != round_id);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
