//! All game entity types — pure data, no logic.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Normal,
    Bonus,
    /// Worth negative points in the arcade table; the score floors at zero.
    Bomb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Active,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetPhase {
    Visible,
    /// Hit and shrinking away; removed once the fade duration elapses.
    Fading,
}

/// Size of the play area targets are placed in, in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u16,
    pub height: u16,
}

// ── Targets ───────────────────────────────────────────────────────────────────

pub type TargetId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    pub score_value: i32,
    pub x: i32,
    pub y: i32,
    pub phase: TargetPhase,
}

// ── Round state ───────────────────────────────────────────────────────────────

/// Everything that changes during one round.  Owned by the controller and
/// handed out by reference for rendering.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub score: u32,
    pub time_remaining_secs: u32,
    pub status: RoundStatus,
    pub targets: Vec<Target>,
    pub sound_enabled: bool,
    pub bounds: Bounds,
    /// Next id handed to a spawned target.
    pub next_target_id: TargetId,
}

impl RoundState {
    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }
}

/// What the controller reports back to the game loop after running due work.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEvent {
    TargetSpawned(TargetId),
    TargetHit { id: TargetId, kind: TargetKind, score: u32 },
    TargetRemoved(TargetId),
    Tick { time_remaining_secs: u32 },
    RoundEnded { final_score: u32 },
}

// ── Persisted settings ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersistedSettings {
    pub high_score: u32,
    pub sound_enabled: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            high_score: 0,
            sound_enabled: true,
        }
    }
}

/// Result of offering a finished round's score to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordOutcome {
    pub updated: bool,
    pub high_score: u32,
}
