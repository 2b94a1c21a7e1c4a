//! Round configuration: duration, spawn schedule and the target table.
//!
//! Two presets cover the shipped variants; a TOML file can override any
//! field, with missing sections falling back to the classic preset.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::entities::TargetKind;
use crate::error::{GameError, Result};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SpawnInterval {
    Fixed { ms: u64 },
    /// Uniform in `[min_ms, max_ms)`.
    RandomRange { min_ms: u64, max_ms: u64 },
}

impl Default for SpawnInterval {
    fn default() -> Self {
        SpawnInterval::Fixed { ms: 1500 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TargetSpec {
    pub kind: TargetKind,
    pub score: i32,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Classic,
    Arcade,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    pub round_duration_secs: u32,
    pub spawn_interval: SpawnInterval,
    pub targets: Vec<TargetSpec>,
    /// How long a hit target stays on screen before it is removed.
    pub fade_ms: u64,
    /// Delay before retrying a spawn when the play area is too small.
    pub spawn_retry_ms: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl RoundConfig {
    /// 30 second round, one star every 1.5 s, single star type.
    pub fn classic() -> Self {
        Self {
            round_duration_secs: 30,
            spawn_interval: SpawnInterval::Fixed { ms: 1500 },
            targets: vec![TargetSpec {
                kind: TargetKind::Normal,
                score: 10,
                weight: 1,
            }],
            fade_ms: 200,
            spawn_retry_ms: 100,
        }
    }

    /// 60 second round, jittered spawns, normal/bonus/bomb stars.
    pub fn arcade() -> Self {
        Self {
            round_duration_secs: 60,
            spawn_interval: SpawnInterval::RandomRange {
                min_ms: 100,
                max_ms: 1750,
            },
            targets: vec![
                TargetSpec {
                    kind: TargetKind::Normal,
                    score: 10,
                    weight: 70,
                },
                TargetSpec {
                    kind: TargetKind::Bonus,
                    score: 30,
                    weight: 20,
                },
                TargetSpec {
                    kind: TargetKind::Bomb,
                    score: -20,
                    weight: 10,
                },
            ],
            fade_ms: 200,
            spawn_retry_ms: 100,
        }
    }

    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Arcade => Self::arcade(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: RoundConfig = toml::from_str(text)?;
        cfg.ensure_valid()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(&path)?;
        let cfg = Self::from_toml_str(&text)?;
        log::info!("Loaded round config from {}", path.as_ref().display());
        Ok(cfg)
    }

    /// Score value configured for `kind`, if the table has it.
    pub fn score_for(&self, kind: TargetKind) -> Option<i32> {
        self.targets.iter().find(|t| t.kind == kind).map(|t| t.score)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.round_duration_secs == 0 {
            w.push("round_duration_secs must be > 0".into());
        }
        match self.spawn_interval {
            SpawnInterval::Fixed { ms } if ms == 0 => {
                w.push("spawn_interval.ms must be > 0".into());
            }
            SpawnInterval::RandomRange { min_ms, max_ms } if min_ms >= max_ms => {
                w.push(format!(
                    "spawn_interval range [{min_ms}, {max_ms}) is empty"
                ));
            }
            SpawnInterval::RandomRange { min_ms, .. } if min_ms == 0 => {
                w.push("spawn_interval.min_ms must be > 0".into());
            }
            _ => {}
        }
        if self.targets.is_empty() {
            w.push("targets table is empty".into());
        } else if self.targets.iter().all(|t| t.weight == 0) {
            w.push("every target has weight 0".into());
        }
        if self.spawn_retry_ms == 0 {
            w.push("spawn_retry_ms must be > 0".into());
        }
        w
    }

    pub fn ensure_valid(&self) -> Result<()> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(GameError::InvalidConfig(problems.join("; ")))
        }
    }
}
