use star_catcher::config::{RoundConfig, SpawnInterval};
use star_catcher::controller::RoundController;
use star_catcher::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn bounds() -> Bounds {
    Bounds { width: 40, height: 20 }
}

fn start(config: RoundConfig) -> RoundController<StdRng> {
    RoundController::start_round(config, bounds(), true, 0, StdRng::seed_from_u64(7))
        .expect("valid config")
}

fn first_visible(c: &RoundController<StdRng>) -> TargetId {
    c.state()
        .targets
        .iter()
        .find(|t| t.phase == TargetPhase::Visible)
        .map(|t| t.id)
        .expect("a visible target")
}

fn ended_with(events: &[RoundEvent]) -> Option<u32> {
    events.iter().find_map(|e| match e {
        RoundEvent::RoundEnded { final_score } => Some(*final_score),
        _ => None,
    })
}

#[test]
fn start_round_initial_state() {
    let c = start(RoundConfig::classic());
    let s = c.state();
    assert_eq!(s.score, 0);
    assert_eq!(s.time_remaining_secs, 30);
    assert!(s.is_active());
    assert!(s.sound_enabled);
    assert_eq!(c.pending_jobs(), 2); // first tick + first spawn
}

#[test]
fn first_spawn_is_immediate_and_tick_is_one_second_out() {
    let mut c = start(RoundConfig::classic());
    let events = c.advance(0);
    assert_eq!(events, vec![RoundEvent::TargetSpawned(1)]);
    let events = c.advance(1000);
    assert_eq!(events, vec![RoundEvent::Tick { time_remaining_secs: 29 }]);
}

#[test]
fn two_hits_then_expiry_scores_twenty() {
    let mut c = start(RoundConfig::classic());

    assert!(ended_with(&c.advance(2000)).is_none());
    let id = first_visible(&c);
    assert!(c.hit_target(id, 2000).is_some());

    assert!(ended_with(&c.advance(29_000)).is_none());
    let id = first_visible(&c);
    assert!(c.hit_target(id, 29_000).is_some());

    let events = c.advance(29_999);
    assert!(ended_with(&events).is_none());
    assert!(c.state().is_active());
    assert_eq!(c.state().time_remaining_secs, 1);

    let events = c.advance(30_000);
    assert_eq!(ended_with(&events), Some(20));
    assert_eq!(c.state().time_remaining_secs, 0);
    assert!(!c.state().is_active());
}

#[test]
fn round_ends_exactly_once() {
    let mut c = start(RoundConfig::classic());
    let mut ends = 0;
    for now in (0..=40_000).step_by(250) {
        ends += c
            .advance(now)
            .iter()
            .filter(|e| matches!(e, RoundEvent::RoundEnded { .. }))
            .count();
    }
    assert_eq!(ends, 1);
}

#[test]
fn round_end_cancels_pending_work_and_sweeps_targets() {
    let mut c = start(RoundConfig::classic());
    c.advance(30_000);
    assert_eq!(c.pending_jobs(), 0);
    assert!(c.state().targets.is_empty());
    assert!(c.advance(100_000).is_empty());
}

#[test]
fn late_hit_is_ignored() {
    let mut c = start(RoundConfig::classic());
    c.advance(29_500);
    let id = first_visible(&c);
    c.advance(30_000);
    assert!(c.hit_target(id, 30_100).is_none());
    assert!(c.click(10, 10, 30_100).is_none());
    assert_eq!(c.state().score, 0);
}

#[test]
fn hit_target_reports_kind_and_running_score() {
    let mut c = start(RoundConfig::classic());
    c.advance(0);
    let id = first_visible(&c);
    let event = c.hit_target(id, 0);
    assert_eq!(
        event,
        Some(RoundEvent::TargetHit { id, kind: TargetKind::Normal, score: 10 })
    );
}

#[test]
fn double_hit_counts_once() {
    let mut c = start(RoundConfig::classic());
    c.advance(0);
    let id = first_visible(&c);
    assert!(c.hit_target(id, 10).is_some());
    assert!(c.hit_target(id, 20).is_none());
    assert_eq!(c.state().score, 10);
}

#[test]
fn click_resolves_position() {
    let mut c = start(RoundConfig::classic());
    c.advance(0);
    let t = c.state().targets[0].clone();
    // Border cell, never covered by a target
    assert!(c.click(0, 0, 5).is_none());
    assert!(c.click(t.x + 1, t.y, 5).is_some());
    assert_eq!(c.state().score, 10);
}

#[test]
fn hit_target_fades_then_is_removed() {
    let mut c = start(RoundConfig::classic());
    c.advance(0);
    let id = first_visible(&c);
    c.hit_target(id, 500);

    assert!(c.advance(699).is_empty());
    assert_eq!(c.state().target(id).unwrap().phase, TargetPhase::Fading);

    let events = c.advance(700);
    assert_eq!(events, vec![RoundEvent::TargetRemoved(id)]);
    assert!(c.state().target(id).is_none());
}

#[test]
fn stop_cancels_everything_without_reporting_end() {
    let mut c = start(RoundConfig::classic());
    c.advance(5_000);
    c.stop();
    assert_eq!(c.pending_jobs(), 0);
    assert!(!c.state().is_active());
    assert!(c.state().targets.is_empty());
    assert!(c.advance(100_000).is_empty());
}

#[test]
fn tiny_play_area_retries_spawn_until_resized() {
    let mut c = RoundController::start_round(
        RoundConfig::classic(),
        Bounds { width: 4, height: 4 },
        false,
        0,
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    let events = c.advance(950);
    assert!(!events.iter().any(|e| matches!(e, RoundEvent::TargetSpawned(_))));
    assert!(c.state().targets.is_empty());

    c.resize(bounds());
    let events = c.advance(1_000);
    assert!(events.contains(&RoundEvent::TargetSpawned(1)));
}

#[test]
fn arcade_spawns_at_jittered_rate() {
    let mut c = start(RoundConfig::arcade());
    let mut spawned = 0;
    let mut ticks = 0;
    for now in (0..=60_000).step_by(50) {
        for e in c.advance(now) {
            match e {
                RoundEvent::TargetSpawned(_) => spawned += 1,
                RoundEvent::Tick { .. } => ticks += 1,
                _ => {}
            }
        }
    }
    assert_eq!(ticks, 60);
    // Gaps are in [100, 1750) ms
    assert!(spawned >= 60_000 / 1750, "only {spawned} spawns");
    assert!(spawned <= 60_000 / 100 + 1, "{spawned} spawns");
}

#[test]
fn score_equals_sum_of_hits_before_end() {
    let mut c = start(RoundConfig::classic());
    let mut expected = 0u32;
    for now in (0..=35_000u64).step_by(500) {
        c.advance(now);
        if now % 2_000 == 0 {
            if let Some(t) = c
                .state()
                .targets
                .iter()
                .find(|t| t.phase == TargetPhase::Visible)
                .cloned()
            {
                if c.hit_target(t.id, now).is_some() {
                    expected += t.score_value as u32;
                }
            }
        }
    }
    assert!(!c.state().is_active());
    assert!(expected > 0);
    assert_eq!(c.state().score, expected);
}

// ── config checks at round start ──────────────────────────────────────────────

fn try_start(config: RoundConfig) -> star_catcher::Result<RoundController<StdRng>> {
    RoundController::start_round(config, bounds(), true, 0, StdRng::seed_from_u64(7))
}

#[test]
fn zero_spawn_interval_is_refused() {
    let mut cfg = RoundConfig::classic();
    cfg.spawn_interval = SpawnInterval::Fixed { ms: 0 };
    assert!(matches!(
        try_start(cfg),
        Err(star_catcher::GameError::InvalidConfig(_))
    ));
}

#[test]
fn zero_width_random_range_is_refused() {
    let mut cfg = RoundConfig::arcade();
    cfg.spawn_interval = SpawnInterval::RandomRange { min_ms: 0, max_ms: 0 };
    assert!(try_start(cfg).is_err());
}

#[test]
fn zero_spawn_retry_is_refused() {
    let mut cfg = RoundConfig::classic();
    cfg.spawn_retry_ms = 0;
    assert!(try_start(cfg).is_err());
}

#[test]
fn every_accepted_round_makes_progress() {
    // Shortest delays validation allows: each advance must still return and
    // queue work strictly in the future.
    let mut cfg = RoundConfig::classic();
    cfg.spawn_interval = SpawnInterval::Fixed { ms: 1 };
    cfg.spawn_retry_ms = 1;
    let mut c = try_start(cfg).unwrap();
    let events = c.advance(10);
    let spawned = events
        .iter()
        .filter(|e| matches!(e, RoundEvent::TargetSpawned(_)))
        .count();
    assert_eq!(spawned, 11); // t = 0..=10
    assert_eq!(c.state().targets.len(), 11);
}
