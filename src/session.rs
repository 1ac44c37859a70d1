//! Session controller: the round state machine
//!
//! `Setup -> Playing -> Completed -> Setup`, with `Playing -> Setup` as an
//! early exit. The session is the single owner of config, the live round and
//! the frozen results. Presentation layers read accessors or subscribe to
//! [`SessionSnapshot`]s; they never mutate state directly.

use glam::Vec2;
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::SessionError;
use crate::results::ResultsSnapshot;
use crate::sim::spawn::spawn_initial;
use crate::sim::{
    Bubble, ClickOutcome, GameEvent, GameMetrics, GamePhase, GameState, PlayBounds, TickStatus,
    resolve_click, tick,
};

/// What presentation layers see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub config: GameConfig,
    pub metrics: GameMetrics,
    /// Whole seconds left on the clock (0 outside play)
    pub time_remaining_secs: u32,
}

/// Snapshot subscriber
pub type SnapshotListener = Box<dyn FnMut(&SessionSnapshot)>;

/// Owns everything about the current game session
pub struct Session {
    config: GameConfig,
    phase: GamePhase,
    round: Option<GameState>,
    results: Option<ResultsSnapshot>,
    /// Bumped every round so deferred work can tell rounds apart
    round_counter: u64,
    /// Events from rounds that already ended, not yet drained
    events: Vec<GameEvent>,
    listeners: Vec<SnapshotListener>,
    /// Last tick time, for the countdown in snapshots
    last_now_ms: f64,
    idle_metrics: GameMetrics,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("round_counter", &self.round_counter)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: GamePhase::Setup,
            round: None,
            results: None,
            round_counter: 0,
            events: Vec::new(),
            listeners: Vec::new(),
            last_now_ms: 0.0,
            idle_metrics: GameMetrics::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace the config (setup screen only)
    pub fn set_config(&mut self, config: GameConfig) -> Result<(), SessionError> {
        self.require(GamePhase::Setup, "change config")?;
        self.config = config;
        self.publish();
        Ok(())
    }

    /// Live bubbles in draw order (empty outside play)
    pub fn bubbles(&self) -> &[Bubble] {
        self.round
            .as_ref()
            .map(|r| r.bubbles.as_slice())
            .unwrap_or(&[])
    }

    /// Current metrics: live during play, frozen once completed, zero in setup
    pub fn metrics(&self) -> &GameMetrics {
        if let Some(round) = &self.round {
            &round.metrics
        } else if let Some(results) = &self.results {
            &results.metrics
        } else {
            &self.idle_metrics
        }
    }

    /// Frozen results, available once the round is completed
    pub fn results(&self) -> Option<&ResultsSnapshot> {
        self.results.as_ref()
    }

    /// Difficulty multiplier applied on the last tick
    pub fn speed_multiplier(&self) -> f32 {
        self.round.as_ref().map_or(1.0, |r| r.speed_multiplier)
    }

    /// Whole seconds left, rounded up like a countdown display
    pub fn time_remaining_secs(&self, now: f64) -> u32 {
        self.round
            .as_ref()
            .map_or(0, |r| (r.remaining_ms(now) / 1000.0).ceil() as u32)
    }

    /// Resize the play area (takes effect for new spawns and bounces)
    pub fn resize(&mut self, bounds: PlayBounds) {
        if let Some(round) = &mut self.round {
            round.bounds = bounds;
        }
    }

    /// `Setup -> Playing`
    pub fn start(&mut self, now: f64, bounds: PlayBounds, seed: u64) -> Result<(), SessionError> {
        self.require(GamePhase::Setup, "start a round")?;
        if let Err(e) = self.config.validate() {
            log::warn!("Refusing to start: {e}");
            return Err(e);
        }

        self.round_counter += 1;
        self.results = None;
        let mut round = GameState::new(&self.config, bounds, seed, self.round_counter, now);
        spawn_initial(&mut round, now);
        round.emit(GameEvent::RoundStart);
        round.emit(GameEvent::AmbientLoopStart);

        log::info!(
            "Round {} started for {} ({} bubbles, {} s, seed {})",
            self.round_counter,
            round.player_name,
            round.target_population,
            self.config.game_time_secs,
            seed
        );

        self.round = Some(round);
        self.phase = GamePhase::Playing;
        self.last_now_ms = now;
        self.publish();
        Ok(())
    }

    /// Advance the live round. Ignored outside play.
    pub fn tick(&mut self, now: f64) -> TickStatus {
        let Some(round) = self.round.as_mut() else {
            return TickStatus::Inactive;
        };
        self.last_now_ms = now;

        let derived_before = round.metrics.derived;
        let status = tick(round, now);
        let metrics_changed = round.metrics.derived != derived_before;

        match status {
            TickStatus::Expired => self.complete(),
            TickStatus::Running if metrics_changed => self.publish(),
            _ => {}
        }
        status
    }

    /// Resolve a pointer action. Returns `None` outside play.
    pub fn click(&mut self, point: Vec2, now: f64) -> Option<ClickOutcome> {
        let round = self.round.as_mut()?;
        if !round.active {
            return None;
        }
        let outcome = resolve_click(round, point, now);
        self.publish();
        Some(outcome)
    }

    /// `Playing -> Setup` without results
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        self.require(GamePhase::Playing, "abandon")?;
        if let Some(mut round) = self.round.take() {
            round.finish();
            round.emit(GameEvent::AmbientLoopStop);
            self.events.append(&mut round.events);
            log::info!("Round {} abandoned", round.round_id);
        }
        self.phase = GamePhase::Setup;
        self.publish();
        Ok(())
    }

    /// `Completed -> Setup`; config is kept, metrics cleared
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.require(GamePhase::Completed, "reset")?;
        self.results = None;
        self.phase = GamePhase::Setup;
        self.publish();
        Ok(())
    }

    /// Take all pending audio/haptic events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.events);
        if let Some(round) = &mut self.round {
            events.append(&mut round.events);
        }
        events
    }

    /// Register a snapshot listener
    pub fn subscribe(&mut self, listener: SnapshotListener) {
        self.listeners.push(listener);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            config: self.config.clone(),
            metrics: self.metrics().clone(),
            time_remaining_secs: self.time_remaining_secs(self.last_now_ms),
        }
    }

    /// `Playing -> Completed`: freeze metrics, discard bubbles
    fn complete(&mut self) {
        if let Some(mut round) = self.round.take() {
            self.events.append(&mut round.events);
            let results = ResultsSnapshot::new(self.config.clone(), round.metrics);
            log::info!(
                "Round {} complete: {} hits, {} misses, {:.0}% accuracy",
                round.round_id,
                results.metrics.hits,
                results.metrics.misses,
                results.metrics.derived.accuracy
            );
            self.results = Some(results);
        }
        self.phase = GamePhase::Completed;
        self.publish();
    }

    fn require(&self, phase: GamePhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            log::warn!("Cannot {action} while in {:?}", self.phase);
            Err(SessionError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }

    fn publish(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
