//! Level progress: decides when and what to spawn.

use rand::Rng;

use crate::game::{Millis, Rules, TimedSpawner, ZombieKind};
use crate::level::SpawnPlan;

/// A zombie the driver wants spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Kind to spawn.
    pub kind: ZombieKind,
    /// Lane to spawn in.
    pub lane: u8,
}

/// What one driver update decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    /// Zombies to spawn this tick, in order.
    pub spawns: Vec<SpawnOrder>,
    /// Index of a wave that just started (after the first).
    pub wave_started: Option<usize>,
    /// The plan has nothing left to spawn as of this tick.
    pub completed_now: bool,
}

/// Progress through a level's spawn plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    wave_index: usize,
    spawned_in_wave: u32,
    next_spawn_ms: Millis,
    completed: bool,
    /// Present for timed plans.
    timed: Option<TimedSpawner>,
}

impl LevelProgress {
    /// Fresh progress for a plan. The first wave spawn is due immediately.
    #[must_use]
    pub fn new(plan: &SpawnPlan) -> Self {
        let timed = match plan {
            SpawnPlan::Waves { .. } => None,
            SpawnPlan::Timed(t) => Some(TimedSpawner::new(t.start_delay_ms, t.interval_ms, t.duration_ms)),
        };
        Self {
            wave_index: 0,
            spawned_in_wave: 0,
            next_spawn_ms: 0.0,
            completed: false,
            timed,
        }
    }

    /// Current wave index (0-based). Equals the wave count once done.
    #[must_use]
    pub const fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Zombies spawned so far in the current wave.
    #[must_use]
    pub const fn spawned_in_wave(&self) -> u32 {
        self.spawned_in_wave
    }

    /// Countdown to the next wave spawn.
    #[must_use]
    pub const fn next_spawn_ms(&self) -> Millis {
        self.next_spawn_ms
    }

    /// Check if the plan has nothing left to spawn.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Wave number for display (1-based, capped at the total).
    #[must_use]
    pub fn display_wave(&self, plan: &SpawnPlan) -> usize {
        let total = plan.wave_count();
        (self.wave_index + 1).min(total)
    }

    /// Time until a timed plan stops spawning.
    #[must_use]
    pub fn timed_remaining_ms(&self, elapsed: Millis) -> Option<Millis> {
        self.timed.as_ref().map(|t| t.remaining_ms(elapsed))
    }

    /// Advance the driver by one tick.
    ///
    /// `elapsed` already includes `delta`. `live_zombies` is the number of
    /// zombies on the lawn before this tick's spawns.
    pub fn update<R: Rng>(
        &mut self,
        plan: &SpawnPlan,
        rules: &Rules,
        elapsed: Millis,
        delta: Millis,
        live_zombies: usize,
        rng: &mut R,
    ) -> ProgressUpdate {
        let mut update = ProgressUpdate::default();
        if self.completed {
            return update;
        }

        match plan {
            SpawnPlan::Waves { waves } => {
                let Some(wave) = waves.get(self.wave_index) else {
                    self.completed = true;
                    update.completed_now = true;
                    return update;
                };

                self.next_spawn_ms -= delta;

                if self.spawned_in_wave >= wave.count {
                    if live_zombies == 0 {
                        self.wave_index += 1;
                        self.spawned_in_wave = 0;
                        self.next_spawn_ms = rules.wave_grace_ms;
                        if self.wave_index < waves.len() {
                            update.wave_started = Some(self.wave_index);
                        }
                    }
                    return update;
                }

                if self.next_spawn_ms <= 0.0 {
                    let kind = wave.types[rng.random_range(0..wave.types.len())];
                    update.spawns.push(SpawnOrder {
                        kind,
                        lane: rng.random_range(0..rules.rows),
                    });
                    self.spawned_in_wave += 1;
                    let (min, max) = wave.delay_range_ms;
                    self.next_spawn_ms = rng.random_range(min..=max);
                }
            }
            SpawnPlan::Timed(config) => {
                let Some(spawner) = self.timed.as_mut() else {
                    return update;
                };
                for _ in 0..spawner.poll(elapsed) {
                    let kind = config.types[rng.random_range(0..config.types.len())];
                    update.spawns.push(SpawnOrder {
                        kind,
                        lane: rng.random_range(0..rules.rows),
                    });
                }
                self.spawned_in_wave = spawner.emitted();
                if spawner.is_finished(elapsed) {
                    self.completed = true;
                    update.completed_now = true;
                }
            }
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelSet, TimedSpawnConfig, WaveConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn one_wave(count: u32) -> SpawnPlan {
        SpawnPlan::Waves {
            waves: vec![WaveConfig {
                count,
                delay_range_ms: (1000.0, 1000.0),
                types: vec![ZombieKind::Cone],
            }],
        }
    }

    #[test]
    fn test_first_spawn_on_first_tick() {
        let plan = one_wave(2);
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut progress = LevelProgress::new(&plan);

        let update = progress.update(&plan, &rules, 16.0, 16.0, 0, &mut rng);
        assert_eq!(update.spawns.len(), 1);
        assert_eq!(update.spawns[0].kind, ZombieKind::Cone);
        assert!(update.spawns[0].lane < rules.rows);
        assert!((progress.next_spawn_ms() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wave_waits_for_clear_then_completes() {
        let plan = one_wave(1);
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut progress = LevelProgress::new(&plan);

        progress.update(&plan, &rules, 16.0, 16.0, 0, &mut rng);
        assert_eq!(progress.spawned_in_wave(), 1);

        // Zombie still alive: the wave holds
        let update = progress.update(&plan, &rules, 5000.0, 4984.0, 1, &mut rng);
        assert!(update.spawns.is_empty());
        assert_eq!(progress.wave_index(), 0);

        progress.update(&plan, &rules, 5016.0, 16.0, 0, &mut rng);
        assert_eq!(progress.wave_index(), 1);
        assert_eq!(progress.spawned_in_wave(), 0);
        assert!(!progress.is_completed());

        let update = progress.update(&plan, &rules, 5032.0, 16.0, 0, &mut rng);
        assert!(update.completed_now);
        assert!(progress.is_completed());
        assert_eq!(progress.display_wave(&plan), 1);
    }

    #[test]
    fn test_grace_before_next_wave() {
        let plan = LevelSet::builtin().get(1).unwrap().plan.clone();
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut progress = LevelProgress::new(&plan);

        let mut elapsed = 0.0;
        while progress.wave_index() == 0 {
            elapsed += 16.0;
            progress.update(&plan, &rules, elapsed, 16.0, 0, &mut rng);
        }
        assert!((progress.next_spawn_ms() - rules.wave_grace_ms).abs() < f64::EPSILON);

        // No spawn during the grace period
        let update = progress.update(&plan, &rules, elapsed + 3000.0, 3000.0, 0, &mut rng);
        assert!(update.spawns.is_empty());
        let update = progress.update(&plan, &rules, elapsed + 4000.0, 1000.0, 0, &mut rng);
        assert_eq!(update.spawns.len(), 1);
    }

    #[test]
    fn test_timed_plan() {
        let plan = SpawnPlan::Timed(TimedSpawnConfig {
            start_delay_ms: 1000.0,
            interval_ms: 500.0,
            duration_ms: 1000.0,
            types: vec![ZombieKind::Basic],
        });
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut progress = LevelProgress::new(&plan);

        assert!(progress.update(&plan, &rules, 999.0, 999.0, 0, &mut rng).spawns.is_empty());
        assert_eq!(progress.update(&plan, &rules, 1000.0, 1.0, 0, &mut rng).spawns.len(), 1);
        let update = progress.update(&plan, &rules, 2000.0, 1000.0, 3, &mut rng);
        assert_eq!(update.spawns.len(), 1);
        assert!(update.completed_now);
        assert_eq!(progress.timed_remaining_ms(2000.0), Some(0.0));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let plan = LevelSet::builtin().get(2).unwrap().plan.clone();
        let rules = Rules::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut progress = LevelProgress::new(&plan);
            let mut out = Vec::new();
            for i in 1..=2000 {
                let update = progress.update(&plan, &rules, f64::from(i) * 16.0, 16.0, 1, &mut rng);
                out.extend(update.spawns);
            }
            out
        };
        assert_eq!(run(5), run(5));
        assert_eq!(run(5).len(), 8);
    }
}
