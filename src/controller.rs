//! Round controller: owns the round state and the timer queue.
//!
//! The game loop calls [`RoundController::advance`] with the current round
//! clock; every job due by then runs in scheduled order and the resulting
//! [`RoundEvent`]s are handed back for rendering, sound and persistence.

use rand::Rng;

use crate::compute::{
    apply_hit, end_round, init_round, next_spawn_delay, remove_target, spawn_target, target_at,
    tick_round,
};
use crate::config::RoundConfig;
use crate::entities::{Bounds, RoundEvent, RoundState, TargetId};
use crate::error::Result;
use crate::scheduler::Scheduler;

pub const TICK_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Job {
    Tick,
    Spawn,
    RemoveTarget(TargetId),
}

pub struct RoundController<R: Rng> {
    config: RoundConfig,
    state: RoundState,
    scheduler: Scheduler<Job>,
    rng: R,
}

impl<R: Rng> RoundController<R> {
    /// Begin a round at `now_ms`: first tick one second out, first spawn
    /// immediately.  Fails with `InvalidConfig` on any config that
    /// `RoundConfig::validate` rejects; every reschedule delay is then >= 1 ms.
    pub fn start_round(
        config: RoundConfig,
        bounds: Bounds,
        sound_enabled: bool,
        now_ms: u64,
        rng: R,
    ) -> Result<Self> {
        config.ensure_valid()?;
        let state = init_round(&config, bounds, sound_enabled);
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(now_ms + TICK_MS, Job::Tick);
        scheduler.schedule_at(now_ms, Job::Spawn);
        log::info!(
            "Round started: {}s, sound {}, area {}x{}",
            config.round_duration_secs,
            if sound_enabled { "on" } else { "off" },
            bounds.width,
            bounds.height
        );
        Ok(Self {
            config,
            state,
            scheduler,
            rng,
        })
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn pending_jobs(&self) -> usize {
        self.scheduler.len()
    }

    /// The play area changed size; new targets use the new bounds.
    pub fn resize(&mut self, bounds: Bounds) {
        self.state.bounds = bounds;
    }

    /// Run every job due at or before `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        while let Some((due_ms, job)) = self.scheduler.pop_due(now_ms) {
            match job {
                Job::Tick => self.on_tick(due_ms, &mut events),
                Job::Spawn => self.on_spawn(due_ms, &mut events),
                Job::RemoveTarget(id) => {
                    self.state = remove_target(&self.state, id);
                    events.push(RoundEvent::TargetRemoved(id));
                }
            }
        }
        events
    }

    fn on_tick(&mut self, due_ms: u64, events: &mut Vec<RoundEvent>) {
        self.state = tick_round(&self.state);
        events.push(RoundEvent::Tick {
            time_remaining_secs: self.state.time_remaining_secs,
        });
        if self.state.is_active() {
            self.scheduler.schedule_at(due_ms + TICK_MS, Job::Tick);
            return;
        }
        let dropped = self.scheduler.cancel_all();
        log::info!(
            "Round ended with score {} ({} pending jobs cancelled)",
            self.state.score,
            dropped
        );
        events.push(RoundEvent::RoundEnded {
            final_score: self.state.score,
        });
    }

    fn on_spawn(&mut self, due_ms: u64, events: &mut Vec<RoundEvent>) {
        if !self.state.is_active() {
            return;
        }
        match spawn_target(&self.state, &self.config, &mut self.rng) {
            Some(next) => {
                self.state = next;
                let id = self.state.next_target_id - 1;
                log::debug!("Spawned target {id}");
                events.push(RoundEvent::TargetSpawned(id));
                let delay = next_spawn_delay(&self.config.spawn_interval, &mut self.rng);
                self.scheduler.schedule_at(due_ms + delay, Job::Spawn);
            }
            None => {
                log::debug!(
                    "Play area {}x{} too small, retrying spawn",
                    self.state.bounds.width,
                    self.state.bounds.height
                );
                self.scheduler
                    .schedule_at(due_ms + self.config.spawn_retry_ms, Job::Spawn);
            }
        }
    }

    /// Score a hit on target `id`.  Late or repeated hits are ignored.
    pub fn hit_target(&mut self, id: TargetId, now_ms: u64) -> Option<RoundEvent> {
        let Some(next) = apply_hit(&self.state, id) else {
            log::debug!("Ignored hit on target {id}");
            return None;
        };
        let kind = next.target(id).map(|t| t.kind)?;
        self.state = next;
        self.scheduler
            .schedule_at(now_ms + self.config.fade_ms, Job::RemoveTarget(id));
        Some(RoundEvent::TargetHit {
            id,
            kind,
            score: self.state.score,
        })
    }

    /// Resolve a click at cell (`x`, `y`) to a target and hit it.
    pub fn click(&mut self, x: i32, y: i32, now_ms: u64) -> Option<RoundEvent> {
        if !self.state.is_active() {
            return None;
        }
        let id = target_at(&self.state, x, y)?;
        self.hit_target(id, now_ms)
    }

    /// Tear down: cancel all pending work and end the round without
    /// reporting a final score.
    pub fn stop(&mut self) {
        let dropped = self.scheduler.cancel_all();
        if self.state.is_active() {
            log::info!("Round stopped early, {dropped} pending jobs cancelled");
        }
        self.state = end_round(&self.state);
    }
}
