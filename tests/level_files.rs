//! Loading level tables from disk.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;

use tempfile::NamedTempFile;
use verdant::autoplay::Idle;
use verdant::level::SpawnPlan;
use verdant::{ConfigError, LevelSet, Outcome, RunConfig, ZombieKind, run_level};

fn write_table(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const TWO_LEVELS: &str = r#"{
  "levels": [
    {
      "id": 7,
      "name": "Backyard",
      "starting_sun": 75,
      "sunlight_bonus": 1,
      "plan": {
        "mode": "waves",
        "waves": [
          { "count": 2, "delay_range_ms": [1000, 2000], "types": ["basic"] },
          { "count": 1, "delay_range_ms": [0, 0], "types": ["cone", "bucket"] }
        ]
      }
    },
    {
      "id": 8,
      "name": "Night Shift",
      "starting_sun": 50,
      "zombie_speed_modifier": 0.1,
      "plan": {
        "mode": "timed",
        "start_delay_ms": 5000,
        "interval_ms": 4000,
        "duration_ms": 20000,
        "types": ["bucket"]
      }
    }
  ]
}"#;

#[test]
fn test_load_table_from_file() {
    let file = write_table(TWO_LEVELS);
    let table = LevelSet::load(file.path()).unwrap();

    assert_eq!(table.len(), 2);
    let backyard = table.get(1).unwrap();
    assert_eq!(backyard.name, "Backyard");
    assert_eq!(backyard.starting_funds(), 100);
    assert!(backyard.zombie_speed_modifier.abs() < f64::EPSILON);
    assert_eq!(backyard.plan.zombie_count(), 3);

    let night = table.get(2).unwrap();
    assert!((night.speed_multiplier() - 1.1).abs() < 1e-9);
    match &night.plan {
        SpawnPlan::Timed(timed) => assert_eq!(timed.types, vec![ZombieKind::Bucket]),
        SpawnPlan::Waves { .. } => panic!("expected a timed plan"),
    }
    assert_eq!(night.plan.zombie_count(), 5);
}

#[test]
fn test_round_trip_through_json() {
    let builtin = LevelSet::builtin();
    let file = write_table(&builtin.to_json().unwrap());
    assert_eq!(LevelSet::load(file.path()).unwrap(), builtin);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = LevelSet::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_json() {
    let file = write_table("{ \"levels\": [ { \"id\": 1 ");
    assert!(matches!(LevelSet::load(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_zombie_type() {
    let file = write_table(&TWO_LEVELS.replace("\"cone\"", "\"gargantuar\""));
    assert!(matches!(LevelSet::load(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_tables_rejected() {
    let empty = write_table(r#"{ "levels": [] }"#);
    assert_eq!(LevelSet::load(empty.path()), Err(ConfigError::NoLevels));

    let inverted = write_table(&TWO_LEVELS.replace("[1000, 2000]", "[2000, 1000]"));
    assert!(matches!(
        LevelSet::load(inverted.path()),
        Err(ConfigError::InvalidDelayRange { level: 7, wave: 0, .. })
    ));

    let empty_wave = write_table(&TWO_LEVELS.replace("\"count\": 1", "\"count\": 0"));
    assert_eq!(
        LevelSet::load(empty_wave.path()),
        Err(ConfigError::EmptyWave { level: 7, wave: 1 })
    );

    let no_interval = write_table(&TWO_LEVELS.replace("\"interval_ms\": 4000", "\"interval_ms\": 0"));
    assert!(matches!(
        LevelSet::load(no_interval.path()),
        Err(ConfigError::InvalidSpawner { level: 8, .. })
    ));
}

#[test]
fn test_loaded_level_runs() {
    let file = write_table(TWO_LEVELS);
    let table = LevelSet::load(file.path()).unwrap();
    let config = RunConfig::new(table.get(1).unwrap().clone());

    let result = run_level(&config, 4, &mut Idle).unwrap();
    assert_eq!(result.outcome, Outcome::Defeat);
    assert_eq!(result.level_name, "Backyard");
}
