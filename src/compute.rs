//! Pure round-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `RoundState` (and, where needed, an RNG handle) and returns a brand-new
//! `RoundState`.  Side effects are limited to the injected RNG; scheduling
//! lives in the controller.

use std::ops::Range;

use rand::Rng;

use crate::config::{RoundConfig, SpawnInterval, TargetSpec};
use crate::entities::{Bounds, RoundState, RoundStatus, Target, TargetId, TargetPhase};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state of a fresh round.
pub fn init_round(config: &RoundConfig, bounds: Bounds, sound_enabled: bool) -> RoundState {
    RoundState {
        score: 0,
        time_remaining_secs: config.round_duration_secs,
        status: RoundStatus::Active,
        targets: Vec::new(),
        sound_enabled,
        bounds,
        next_target_id: 1,
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Cells a target centre may occupy: columns 2 .. width-3 and rows
/// 2 .. height-3.  The 3-wide sprite then spans columns 1 .. width-2, inside
/// the border.
pub fn placement_area(bounds: Bounds) -> Option<(Range<i32>, Range<i32>)> {
    let xs = 2..(bounds.width as i32 - 2);
    let ys = 2..(bounds.height as i32 - 2);
    if xs.is_empty() || ys.is_empty() {
        None
    } else {
        Some((xs, ys))
    }
}

/// Weighted pick from the target table.
pub fn pick_target_spec<'a>(config: &'a RoundConfig, rng: &mut impl Rng) -> Option<&'a TargetSpec> {
    // u64 so any number of u32 weights sums without overflow
    let total: u64 = config.targets.iter().map(|t| u64::from(t.weight)).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for spec in &config.targets {
        let weight = u64::from(spec.weight);
        if roll < weight {
            return Some(spec);
        }
        roll -= weight;
    }
    None
}

/// Place one new target at a random position.  Returns `None` when the play
/// area is too small to hold a target, or the round is over.
pub fn spawn_target(
    state: &RoundState,
    config: &RoundConfig,
    rng: &mut impl Rng,
) -> Option<RoundState> {
    if !state.is_active() {
        return None;
    }
    let (xs, ys) = placement_area(state.bounds)?;
    let spec = pick_target_spec(config, rng)?;

    let target = Target {
        id: state.next_target_id,
        kind: spec.kind,
        score_value: spec.score,
        x: rng.gen_range(xs),
        y: rng.gen_range(ys),
        phase: TargetPhase::Visible,
    };
    let mut targets = state.targets.clone();
    targets.push(target);
    Some(RoundState {
        targets,
        next_target_id: state.next_target_id + 1,
        ..state.clone()
    })
}

/// Delay until the next spawn under `policy`.
pub fn next_spawn_delay(policy: &SpawnInterval, rng: &mut impl Rng) -> u64 {
    match *policy {
        SpawnInterval::Fixed { ms } => ms,
        SpawnInterval::RandomRange { min_ms, max_ms } => {
            if min_ms >= max_ms {
                min_ms
            } else {
                rng.gen_range(min_ms..max_ms)
            }
        }
    }
}

// ── Hits ─────────────────────────────────────────────────────────────────────

/// Target whose 3-wide sprite covers the clicked cell.  Fading targets can't
/// be hit again.
pub fn target_at(state: &RoundState, x: i32, y: i32) -> Option<TargetId> {
    state
        .targets
        .iter()
        .rev() // most recently spawned is drawn on top
        .find(|t| t.phase == TargetPhase::Visible && t.y == y && (t.x - x).abs() <= 1)
        .map(|t| t.id)
}

/// Score a hit on `id`.  Returns `None` (nothing changes) if the round has
/// ended, the target doesn't exist, or it was already hit.
pub fn apply_hit(state: &RoundState, id: TargetId) -> Option<RoundState> {
    if !state.is_active() {
        return None;
    }
    let hit = state
        .targets
        .iter()
        .find(|t| t.id == id && t.phase == TargetPhase::Visible)?;

    let score = state.score.saturating_add_signed(hit.score_value);
    let targets = state
        .targets
        .iter()
        .map(|t| {
            if t.id == id {
                Target {
                    phase: TargetPhase::Fading,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();

    Some(RoundState {
        score,
        targets,
        ..state.clone()
    })
}

pub fn remove_target(state: &RoundState, id: TargetId) -> RoundState {
    RoundState {
        targets: state.targets.iter().filter(|t| t.id != id).cloned().collect(),
        ..state.clone()
    }
}

// ── Countdown ────────────────────────────────────────────────────────────────

/// One second of countdown.  When the clock reaches zero the round ends and
/// every target still on screen is swept.
pub fn tick_round(state: &RoundState) -> RoundState {
    if !state.is_active() {
        return state.clone();
    }
    let time_remaining_secs = state.time_remaining_secs.saturating_sub(1);
    if time_remaining_secs == 0 {
        RoundState {
            time_remaining_secs,
            status: RoundStatus::Ended,
            targets: Vec::new(),
            ..state.clone()
        }
    } else {
        RoundState {
            time_remaining_secs,
            ..state.clone()
        }
    }
}

/// End the round early without a countdown, sweeping targets.
pub fn end_round(state: &RoundState) -> RoundState {
    RoundState {
        status: RoundStatus::Ended,
        targets: Vec::new(),
        ..state.clone()
    }
}
