//! Headless runs: `(level, seed, strategy) -> RunResult`.
//!
//! A run ticks a fresh session at a fixed step, lets the strategy act
//! before every tick, and stops at victory, defeat or a time limit.
//! Batches fan independent seeds out over rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::autoplay::{Strategy, StrategyKind};
use crate::error::RunError;
use crate::game::{Millis, Rules, RunState, RunStats, Session, check_invariants};
use crate::level::LevelConfig;

/// Settings for a headless run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Level to play.
    pub level: LevelConfig,
    /// Simulation rules.
    pub rules: Rules,
    /// Simulation time per tick.
    pub step_ms: Millis,
    /// Simulation time after which the run is called a timeout.
    pub max_ms: Millis,
    /// Run structural checks after every tick.
    pub check_invariants: bool,
}

impl RunConfig {
    /// Default settings for a level: 16 ms ticks, ten minute limit.
    #[must_use]
    pub fn new(level: LevelConfig) -> Self {
        Self {
            level,
            rules: Rules::default(),
            step_ms: 16.0,
            max_ms: 600_000.0,
            check_invariants: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// All zombies defeated.
    Victory,
    /// A zombie reached the house.
    Defeat,
    /// Time limit reached first.
    Timeout,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Victory => "victory",
            Outcome::Defeat => "defeat",
            Outcome::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Level id.
    pub level_id: u32,
    /// Level name.
    pub level_name: String,
    /// Seed used.
    pub seed: u64,
    /// Strategy name.
    pub strategy: String,
    /// How it ended.
    pub outcome: Outcome,
    /// Simulation time played.
    pub elapsed_ms: Millis,
    /// Ticks executed.
    pub ticks: u64,
    /// Sun left at the end.
    pub final_sun: u32,
    /// Waves reached (1-based).
    pub wave_reached: usize,
    /// Totals.
    pub stats: RunStats,
}

/// Play one level to the end.
///
/// # Errors
///
/// Returns an error if the level is invalid, the step is not positive, or
/// (with checks enabled) an invariant breaks.
pub fn run_level(config: &RunConfig, seed: u64, strategy: &mut dyn Strategy) -> Result<RunResult, RunError> {
    if !(config.step_ms.is_finite() && config.step_ms > 0.0) {
        return Err(RunError::InvalidStep(config.step_ms));
    }

    let mut session = Session::new(config.level.clone(), config.rules, seed)?;
    session.start();

    let mut ticks = 0u64;
    while session.state() == RunState::Running && session.elapsed_ms() < config.max_ms {
        let now = session.elapsed_ms();
        strategy.act(&mut session, now);
        session.advance(config.step_ms);
        ticks += 1;

        if config.check_invariants
            && let Some(violation) = check_invariants(session.lawn()).into_iter().next()
        {
            return Err(RunError::Invariant {
                elapsed_ms: session.elapsed_ms(),
                message: violation.message,
            });
        }
    }

    let outcome = match session.state() {
        RunState::Victory => Outcome::Victory,
        RunState::Defeat => Outcome::Defeat,
        _ => Outcome::Timeout,
    };
    tracing::debug!(seed, %outcome, ticks, "run complete");

    Ok(RunResult {
        level_id: session.level().id,
        level_name: session.level().name.clone(),
        seed,
        strategy: strategy.name().to_string(),
        outcome,
        elapsed_ms: session.elapsed_ms(),
        ticks,
        final_sun: session.sun(),
        wave_reached: session.progress().display_wave(&session.level().plan),
        stats: *session.stats(),
    })
}

/// Run `count` seeds starting at `base_seed` in parallel.
///
/// Results come back in seed order.
///
/// # Errors
///
/// Returns the first error any run produced.
pub fn run_batch(
    config: &RunConfig,
    strategy: StrategyKind,
    base_seed: u64,
    count: u64,
) -> Result<Vec<RunResult>, RunError> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut player = strategy.build();
            run_level(config, base_seed.wrapping_add(i), player.as_mut())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoplay::{Gardener, Idle};
    use crate::level::LevelSet;

    fn config(level: usize) -> RunConfig {
        let mut config = RunConfig::new(LevelSet::builtin().get(level).unwrap().clone());
        config.check_invariants = true;
        config
    }

    #[test]
    fn test_idle_loses() {
        let result = run_level(&config(1), 1, &mut Idle).unwrap();
        assert_eq!(result.outcome, Outcome::Defeat);
        assert_eq!(result.stats.plants_placed, 0);
        assert_eq!(result.strategy, "idle");
    }

    #[test]
    fn test_timeout() {
        let mut config = config(1);
        config.max_ms = 1000.0;
        let result = run_level(&config, 1, &mut Idle).unwrap();
        assert_eq!(result.outcome, Outcome::Timeout);
        assert!(result.elapsed_ms >= 1000.0);
    }

    #[test]
    fn test_rejects_bad_step() {
        let mut config = config(1);
        config.step_ms = 0.0;
        assert_eq!(run_level(&config, 1, &mut Idle), Err(RunError::InvalidStep(0.0)));
    }

    #[test]
    fn test_gardener_keeps_invariants() {
        let result = run_level(&config(2), 9, &mut Gardener::default()).unwrap();
        assert!(result.stats.plants_placed > 0);
        assert!(result.stats.shots_fired > 0);
    }

    #[test]
    fn test_deterministic() {
        let a = run_level(&config(1), 77, &mut Gardener::default()).unwrap();
        let b = run_level(&config(1), 77, &mut Gardener::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_in_seed_order() {
        let mut config = config(1);
        config.max_ms = 5000.0;
        let results = run_batch(&config, StrategyKind::Idle, 100, 4).unwrap();
        let seeds: Vec<u64> = results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
    }
}
