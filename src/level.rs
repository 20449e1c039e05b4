//! Level tables.
//!
//! A level is a starting balance, optional difficulty tweaks and a spawn
//! plan. Tables are either the built-in set or a JSON file:
//!
//! ```json
//! {
//!   "levels": [{
//!     "id": 1,
//!     "name": "Day 1",
//!     "starting_sun": 150,
//!     "plan": {
//!       "mode": "waves",
//!       "waves": [{ "count": 6, "delay_range_ms": [3000, 5200], "types": ["basic", "cone"] }]
//!     }
//!   }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{Millis, SUNLIGHT_BONUS_UNIT, ZombieKind};

/// One wave of a wave-based level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Zombies spawned in this wave.
    pub count: u32,
    /// Uniform range the delay between spawns is drawn from.
    pub delay_range_ms: (Millis, Millis),
    /// Kinds to draw from, uniformly.
    pub types: Vec<ZombieKind>,
}

/// Parameters of a fixed-cadence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSpawnConfig {
    /// Quiet period before the first spawn.
    pub start_delay_ms: Millis,
    /// Time between spawns.
    pub interval_ms: Millis,
    /// Length of the spawning window.
    pub duration_ms: Millis,
    /// Kinds to draw from, uniformly.
    pub types: Vec<ZombieKind>,
}

/// How a level produces zombies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SpawnPlan {
    /// Sequential waves; each starts once the previous one is cleared.
    Waves {
        /// Waves in order.
        waves: Vec<WaveConfig>,
    },
    /// One spawn per interval inside a time window.
    Timed(TimedSpawnConfig),
}

impl SpawnPlan {
    /// Number of waves shown to the player. A timed plan counts as one.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        match self {
            SpawnPlan::Waves { waves } => waves.len(),
            SpawnPlan::Timed(_) => 1,
        }
    }

    /// Total number of zombies the plan spawns.
    #[must_use]
    pub fn zombie_count(&self) -> u32 {
        match self {
            SpawnPlan::Waves { waves } => waves.iter().map(|w| w.count).sum(),
            SpawnPlan::Timed(t) => {
                crate::game::TimedSpawner::new(t.start_delay_ms, t.interval_ms, t.duration_ms)
                    .total()
            }
        }
    }
}

/// A playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Identifier shown to the player.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Sun at the start of the level, before the sunlight bonus.
    pub starting_sun: u32,
    /// Extra starting sun, in units of one sky pickup.
    #[serde(default)]
    pub sunlight_bonus: u32,
    /// Relative change to every zombie's base speed (0.06 = 6% faster).
    #[serde(default)]
    pub zombie_speed_modifier: f64,
    /// Spawn plan.
    pub plan: SpawnPlan,
}

impl LevelConfig {
    /// Sun the player starts with.
    #[must_use]
    pub fn starting_funds(&self) -> u32 {
        self.starting_sun
            .saturating_add(self.sunlight_bonus.saturating_mul(SUNLIGHT_BONUS_UNIT))
    }

    /// Multiplier applied to zombie base speed.
    #[must_use]
    pub fn speed_multiplier(&self) -> f64 {
        1.0 + self.zombie_speed_modifier
    }

    /// Check the level for values the simulation cannot run.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.id;
        if !self.zombie_speed_modifier.is_finite() || self.zombie_speed_modifier <= -1.0 {
            return Err(ConfigError::InvalidSpeedModifier {
                level,
                value: self.zombie_speed_modifier,
            });
        }

        match &self.plan {
            SpawnPlan::Waves { waves } => {
                if waves.is_empty() {
                    return Err(ConfigError::NoWaves { level });
                }
                for (wave, config) in waves.iter().enumerate() {
                    if config.count == 0 {
                        return Err(ConfigError::EmptyWave { level, wave });
                    }
                    if config.types.is_empty() {
                        return Err(ConfigError::NoZombieTypes { level });
                    }
                    let (min_ms, max_ms) = config.delay_range_ms;
                    let valid = min_ms.is_finite() && max_ms.is_finite() && 0.0 <= min_ms && min_ms <= max_ms;
                    if !valid {
                        return Err(ConfigError::InvalidDelayRange {
                            level,
                            wave,
                            min_ms,
                            max_ms,
                        });
                    }
                }
            }
            SpawnPlan::Timed(timed) => {
                let reason = if !(timed.interval_ms.is_finite() && timed.interval_ms > 0.0) {
                    Some("interval must be positive")
                } else if !(timed.start_delay_ms.is_finite() && timed.start_delay_ms >= 0.0) {
                    Some("start delay must not be negative")
                } else if !(timed.duration_ms.is_finite() && timed.duration_ms > 0.0) {
                    Some("duration must be positive")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(ConfigError::InvalidSpawner {
                        level,
                        reason: reason.to_string(),
                    });
                }
                if timed.types.is_empty() {
                    return Err(ConfigError::NoZombieTypes { level });
                }
            }
        }
        Ok(())
    }
}

/// An ordered list of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    /// Levels in play order.
    pub levels: Vec<LevelConfig>,
}

fn wave(count: u32, delay_range_ms: (Millis, Millis), types: &[ZombieKind]) -> WaveConfig {
    WaveConfig {
        count,
        delay_range_ms,
        types: types.to_vec(),
    }
}

impl LevelSet {
    /// The levels that ship with the game.
    #[must_use]
    pub fn builtin() -> Self {
        use ZombieKind::{Basic, Bucket, Cone};

        Self {
            levels: vec![
                LevelConfig {
                    id: 1,
                    name: "Day 1".to_string(),
                    starting_sun: 150,
                    sunlight_bonus: 0,
                    zombie_speed_modifier: 0.0,
                    plan: SpawnPlan::Waves {
                        waves: vec![
                            wave(6, (3000.0, 5200.0), &[Basic, Basic, Cone]),
                            wave(8, (2600.0, 4600.0), &[Basic, Basic, Cone]),
                        ],
                    },
                },
                LevelConfig {
                    id: 2,
                    name: "Day 2".to_string(),
                    starting_sun: 125,
                    sunlight_bonus: 1,
                    zombie_speed_modifier: 0.06,
                    plan: SpawnPlan::Waves {
                        waves: vec![
                            wave(8, (2600.0, 4200.0), &[Basic, Cone, Cone]),
                            wave(12, (2000.0, 3600.0), &[Basic, Cone, Bucket]),
                        ],
                    },
                },
                LevelConfig {
                    id: 3,
                    name: "Dusk".to_string(),
                    starting_sun: 100,
                    sunlight_bonus: 2,
                    zombie_speed_modifier: 0.03,
                    plan: SpawnPlan::Timed(TimedSpawnConfig {
                        start_delay_ms: 10_000.0,
                        interval_ms: 6_000.0,
                        duration_ms: 60_000.0,
                        types: vec![Basic, Cone, Bucket],
                    }),
                },
            ],
        }
    }

    /// Parse and validate a JSON level table.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a level is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let set: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Read, parse and validate a JSON level table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Serialise the table as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every level.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        self.levels.iter().try_for_each(LevelConfig::validate)
    }

    /// Level by 1-based position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLevel`] if out of range.
    pub fn get(&self, number: usize) -> Result<&LevelConfig, ConfigError> {
        number
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .ok_or(ConfigError::UnknownLevel {
                requested: number,
                available: self.levels.len(),
            })
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let set = LevelSet::builtin();
        assert_eq!(set.len(), 3);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_starting_funds() {
        let set = LevelSet::builtin();
        assert_eq!(set.get(1).unwrap().starting_funds(), 150);
        assert_eq!(set.get(2).unwrap().starting_funds(), 150);
        assert!((set.get(2).unwrap().speed_multiplier() - 1.06).abs() < 1e-12);
    }

    #[test]
    fn test_get_is_one_based() {
        let set = LevelSet::builtin();
        assert_eq!(set.get(1).unwrap().name, "Day 1");
        assert_eq!(
            set.get(0),
            Err(ConfigError::UnknownLevel {
                requested: 0,
                available: 3
            })
        );
        assert!(set.get(4).is_err());
    }

    #[test]
    fn test_zombie_count() {
        let set = LevelSet::builtin();
        assert_eq!(set.get(1).unwrap().plan.zombie_count(), 14);
        assert_eq!(set.get(2).unwrap().plan.zombie_count(), 20);
        assert_eq!(set.get(3).unwrap().plan.zombie_count(), 10);
    }

    #[test]
    fn test_json_round_trip() {
        let set = LevelSet::builtin();
        let json = set.to_json().unwrap();
        assert_eq!(LevelSet::from_json_str(&json).unwrap(), set);
    }

    #[test]
    fn test_parse_minimal_level() {
        let json = r#"{"levels": [{
            "id": 7, "name": "Test", "starting_sun": 50,
            "plan": {"mode": "waves", "waves": [
                {"count": 1, "delay_range_ms": [0, 0], "types": ["bucket"]}
            ]}
        }]}"#;
        let set = LevelSet::from_json_str(json).unwrap();
        let level = set.get(1).unwrap();
        assert_eq!(level.sunlight_bonus, 0);
        assert!(level.zombie_speed_modifier.abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            LevelSet::from_json_str(r#"{"levels": []}"#),
            Err(ConfigError::NoLevels)
        );
        assert!(matches!(
            LevelSet::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));

        let mut set = LevelSet::builtin();
        if let SpawnPlan::Waves { waves } = &mut set.levels[0].plan {
            waves[1].delay_range_ms = (5000.0, 100.0);
        }
        assert!(matches!(
            set.validate(),
            Err(ConfigError::InvalidDelayRange { level: 1, wave: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_spawner() {
        let mut set = LevelSet::builtin();
        if let SpawnPlan::Timed(timed) = &mut set.levels[2].plan {
            timed.interval_ms = 0.0;
        }
        assert!(matches!(
            set.validate(),
            Err(ConfigError::InvalidSpawner { level: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_modifier() {
        let mut set = LevelSet::builtin();
        set.levels[0].zombie_speed_modifier = -1.0;
        assert!(matches!(
            set.validate(),
            Err(ConfigError::InvalidSpeedModifier { level: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_wave() {
        let mut set = LevelSet::builtin();
        if let SpawnPlan::Waves { waves } = &mut set.levels[1].plan {
            waves[0].count = 0;
        }
        assert_eq!(
            set.validate(),
            Err(ConfigError::EmptyWave { level: 2, wave: 0 })
        );
    }
}
