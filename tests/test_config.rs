use star_catcher::config::*;
use star_catcher::entities::TargetKind;
use star_catcher::GameError;

#[test]
fn presets_are_valid() {
    assert!(RoundConfig::classic().validate().is_empty());
    assert!(RoundConfig::arcade().validate().is_empty());
}

#[test]
fn classic_preset_values() {
    let c = RoundConfig::preset(Variant::Classic);
    assert_eq!(c.round_duration_secs, 30);
    assert_eq!(c.spawn_interval, SpawnInterval::Fixed { ms: 1500 });
    assert_eq!(c.targets.len(), 1);
    assert_eq!(c.fade_ms, 200);
}

#[test]
fn arcade_preset_values() {
    let c = RoundConfig::preset(Variant::Arcade);
    assert_eq!(c.round_duration_secs, 60);
    assert_eq!(
        c.spawn_interval,
        SpawnInterval::RandomRange { min_ms: 100, max_ms: 1750 }
    );
    assert!(c.score_for(TargetKind::Bonus).unwrap() > c.score_for(TargetKind::Normal).unwrap());
    assert!(c.score_for(TargetKind::Bomb).unwrap() < 0);
}

#[test]
fn partial_toml_falls_back_to_classic() {
    let c = RoundConfig::from_toml_str("round_duration_secs = 45\n").unwrap();
    assert_eq!(c.round_duration_secs, 45);
    assert_eq!(c.spawn_interval, SpawnInterval::Fixed { ms: 1500 });
    assert_eq!(c.score_for(TargetKind::Normal), Some(10));
}

#[test]
fn full_toml_parses() {
    let text = r#"
round_duration_secs = 20
fade_ms = 150

[spawn_interval]
policy = "random_range"
min_ms = 200
max_ms = 900

[[targets]]
kind = "normal"
score = 5
weight = 3

[[targets]]
kind = "bomb"
score = -10
"#;
    let c = RoundConfig::from_toml_str(text).unwrap();
    assert_eq!(c.round_duration_secs, 20);
    assert_eq!(c.fade_ms, 150);
    assert_eq!(
        c.spawn_interval,
        SpawnInterval::RandomRange { min_ms: 200, max_ms: 900 }
    );
    assert_eq!(c.targets.len(), 2);
    assert_eq!(c.targets[1].weight, 1);
    assert_eq!(c.score_for(TargetKind::Bomb), Some(-10));
    assert_eq!(c.score_for(TargetKind::Bonus), None);
}

#[test]
fn inverted_range_is_rejected() {
    let text = r#"
[spawn_interval]
policy = "random_range"
min_ms = 900
max_ms = 900
"#;
    assert!(matches!(
        RoundConfig::from_toml_str(text),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn zero_duration_and_empty_table_both_reported() {
    let mut c = RoundConfig::classic();
    c.round_duration_secs = 0;
    c.targets.clear();
    let problems = c.validate();
    assert_eq!(problems.len(), 2);
    assert!(c.ensure_valid().is_err());
}

#[test]
fn all_zero_weights_rejected() {
    let mut c = RoundConfig::arcade();
    for t in c.targets.iter_mut() {
        t.weight = 0;
    }
    assert_eq!(c.validate().len(), 1);
}

#[test]
fn malformed_toml_is_parse_error() {
    assert!(matches!(
        RoundConfig::from_toml_str("round_duration_secs = \"long\""),
        Err(GameError::ConfigParse(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    assert!(matches!(
        RoundConfig::load_from_file("/definitely/not/here.toml"),
        Err(GameError::Io(_))
    ));
}

#[test]
fn max_weights_are_accepted() {
    let mut c = RoundConfig::arcade();
    for t in c.targets.iter_mut() {
        t.weight = u32::MAX;
    }
    assert!(c.validate().is_empty());
}
