//! The simulation context: one level being played.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, PlacementError};
use crate::game::combat::{self, TickReport};
use crate::game::{
    Board, CardStatus, Cell, Lawn, LevelProgress, Millis, PlantId, PlantKind, Rules, Snapshot,
    SunBank, SunPickup,
};
use crate::level::LevelConfig;

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Loaded, waiting for start.
    Ready,
    /// Ticking.
    Running,
    /// Frozen by the player.
    Paused,
    /// Every zombie defeated.
    Victory,
    /// A zombie reached the house.
    Defeat,
}

impl RunState {
    /// Check if the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, RunState::Victory | RunState::Defeat)
    }
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Zombies spawned.
    pub zombies_spawned: u32,
    /// Zombies killed.
    pub zombies_killed: u32,
    /// Plants placed.
    pub plants_placed: u32,
    /// Plants eaten.
    pub plants_lost: u32,
    /// Projectiles fired.
    pub shots_fired: u32,
    /// Projectiles that landed.
    pub hits: u32,
    /// Sun collected from pickups.
    pub sun_collected: u32,
    /// Sun spent on plants.
    pub sun_spent: u32,
    /// Pickups that faded uncollected.
    pub suns_expired: u32,
}

impl RunStats {
    /// Fold a tick report into the totals.
    pub fn record(&mut self, report: &TickReport) {
        self.zombies_spawned += report.spawned;
        self.zombies_killed += report.zombies_killed;
        self.plants_lost += report.plants_lost;
        self.shots_fired += report.shots_fired;
        self.hits += report.hits;
        self.suns_expired += report.suns_expired;
    }
}

/// One level being played.
///
/// All mutation goes through `&mut self`, so ticks and input handlers can
/// never interleave. Two sessions built with the same level, rules and seed
/// and fed the same inputs evolve identically.
#[derive(Debug)]
pub struct Session {
    rules: Rules,
    level: LevelConfig,
    seed: u64,
    lawn: Lawn,
    bank: SunBank,
    progress: LevelProgress,
    state: RunState,
    /// Simulation time since the level started.
    elapsed_ms: Millis,
    /// Countdown to the next sky drop.
    sky_timer_ms: Millis,
    /// Input time of the last placement per plant kind.
    last_placed: [Option<Millis>; PlantKind::COUNT],
    /// Input time before which no placement is accepted.
    blocked_until: Millis,
    selected: Option<PlantKind>,
    rng: StdRng,
    stats: RunStats,
}

impl Session {
    /// Create a session in the `Ready` state.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is invalid or the board has no cells.
    pub fn new(level: LevelConfig, rules: Rules, seed: u64) -> Result<Self, ConfigError> {
        level.validate()?;
        let board = Board::new(rules.rows, rules.cols).ok_or(ConfigError::InvalidBoard {
            rows: rules.rows,
            cols: rules.cols,
        })?;

        let mut session = Self {
            bank: SunBank::new(level.starting_funds()),
            progress: LevelProgress::new(&level.plan),
            lawn: Lawn::new(board),
            state: RunState::Ready,
            elapsed_ms: 0.0,
            sky_timer_ms: rules.sky_sun_interval_ms,
            last_placed: [None; PlantKind::COUNT],
            blocked_until: f64::NEG_INFINITY,
            selected: None,
            rng: StdRng::seed_from_u64(seed),
            stats: RunStats::default(),
            rules,
            level,
            seed,
        };
        session.reset();
        Ok(session)
    }

    /// Restore the level's initial state: empty lawn, starting sun, first
    /// wave, no cooldowns, reseeded randomness.
    ///
    /// Sun listeners stay subscribed and observe the restored balance.
    pub fn reset(&mut self) {
        self.lawn.clear();
        self.progress = LevelProgress::new(&self.level.plan);
        self.state = RunState::Ready;
        self.elapsed_ms = 0.0;
        self.sky_timer_ms = self.rules.sky_sun_interval_ms;
        self.last_placed = [None; PlantKind::COUNT];
        self.blocked_until = f64::NEG_INFINITY;
        self.selected = None;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.stats = RunStats::default();
        self.bank.reset(self.level.starting_funds());
        info!(level = self.level.id, name = %self.level.name, "level ready");
    }

    /// Replace the level and reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is invalid; the session is unchanged.
    pub fn load_level(&mut self, level: LevelConfig) -> Result<(), ConfigError> {
        level.validate()?;
        self.level = level;
        self.reset();
        Ok(())
    }

    /// Begin ticking. Returns `false` unless the session was `Ready`.
    pub fn start(&mut self) -> bool {
        self.transition(RunState::Ready, RunState::Running)
    }

    /// Freeze a running session.
    pub fn pause(&mut self) -> bool {
        self.transition(RunState::Running, RunState::Paused)
    }

    /// Unfreeze a paused session.
    pub fn resume(&mut self) -> bool {
        self.transition(RunState::Paused, RunState::Running)
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            _ => false,
        }
    }

    fn transition(&mut self, from: RunState, to: RunState) -> bool {
        if self.state != from {
            return false;
        }
        self.state = to;
        info!(?from, ?to, elapsed_ms = self.elapsed_ms, "run state changed");
        true
    }

    fn finish(&mut self, outcome: RunState) {
        if self.state.is_terminal() {
            return;
        }
        let from = self.state;
        self.state = outcome;
        self.selected = None;
        info!(?from, to = ?outcome, elapsed_ms = self.elapsed_ms, "run finished");
    }

    /// Advance the simulation by `delta` milliseconds.
    ///
    /// Does nothing unless the session is running. The delta is applied
    /// as-is; frame pacing and clamping belong to the caller.
    pub fn advance(&mut self, delta: Millis) -> TickReport {
        let mut report = TickReport::default();
        if self.state != RunState::Running || !delta.is_finite() || delta < 0.0 {
            return report;
        }

        self.elapsed_ms += delta;
        let now = self.elapsed_ms;

        self.drive_level(delta, &mut report);

        combat::advance_projectiles(&mut self.lawn, &self.rules, delta);
        combat::update_plants(&mut self.lawn, &self.rules, delta, &mut report);
        combat::update_zombies(&mut self.lawn, &self.rules, now, delta, &mut report);
        if report.breached {
            combat::remove_casualties(&mut self.lawn, &mut report);
            self.stats.record(&report);
            self.finish(RunState::Defeat);
            return report;
        }
        combat::resolve_hits(&mut self.lawn, &self.rules, now, &mut report);
        combat::remove_casualties(&mut self.lawn, &mut report);

        self.update_sky(delta, &mut report);
        combat::advance_suns(&mut self.lawn, &self.rules, delta, &mut report);

        self.stats.record(&report);

        if self.progress.is_completed() && self.lawn.zombies.is_empty() {
            self.finish(RunState::Victory);
        }
        // Cooldowns run on input time, so only affordability is rechecked here
        if let Some(kind) = self.selected
            && !self.bank.can_afford(kind.def().cost)
        {
            self.selected = None;
        }
        report
    }

    fn drive_level(&mut self, delta: Millis, report: &mut TickReport) {
        let live = self.lawn.zombies.len();
        let update = self.progress.update(
            &self.level.plan,
            &self.rules,
            self.elapsed_ms,
            delta,
            live,
            &mut self.rng,
        );

        if let Some(wave) = update.wave_started {
            info!(wave = wave + 1, total = self.level.plan.wave_count(), "wave started");
        }
        if update.completed_now {
            info!(elapsed_ms = self.elapsed_ms, "spawning finished");
        }

        let multiplier = self.level.speed_multiplier();
        for order in update.spawns {
            let id = self
                .lawn
                .spawn_zombie(order.kind, order.lane, multiplier, &self.rules);
            debug!(id = id.0, kind = %order.kind, lane = order.lane, "zombie spawned");
            report.spawned += 1;
        }
    }

    fn update_sky(&mut self, delta: Millis, report: &mut TickReport) {
        self.sky_timer_ms -= delta;
        if self.sky_timer_ms > 0.0 {
            return;
        }

        let width = self.rules.board_width();
        let margin = 60.0_f64.min(width / 2.0);
        let x = self.rng.random_range(margin..=width - margin);
        let y = -30.0;
        let rest_y = (self.rules.board_height() - 40.0).min(y + self.rng.random_range(60.0..=160.0));
        self.lawn.suns.push(SunPickup::falling(
            x,
            y,
            rest_y,
            self.rules.sky_sun_value,
            self.rules.sun_lifetime_ms,
        ));
        report.suns_dropped += 1;

        let jitter = self.rules.sky_sun_jitter_ms.abs();
        self.sky_timer_ms = self.rules.sky_sun_interval_ms + self.rng.random_range(-jitter..=jitter);
    }

    /// Collect the newest pickup within reach of a point and credit it.
    ///
    /// Works in every run state. Returns the value collected.
    pub fn collect_sun_at(&mut self, x: f64, y: f64) -> Option<u32> {
        let value = self.lawn.take_sun_at(x, y, self.rules.sun_pickup_radius)?;
        self.bank.add(f64::from(value));
        self.stats.sun_collected += value;
        debug!(value, balance = self.bank.value(), "sun collected");
        Some(value)
    }

    /// Time left on a kind's placement cooldown at input time `now`.
    #[must_use]
    pub fn cooldown_remaining(&self, kind: PlantKind, now: Millis) -> Option<Millis> {
        let last = self.last_placed[kind.index()]?;
        let remaining = kind.def().cooldown_ms - (now - last);
        (remaining > 0.0).then_some(remaining)
    }

    fn check_usable(&self, kind: PlantKind, now: Millis) -> Result<(), PlacementError> {
        if self.state.is_terminal() {
            return Err(PlacementError::GameOver);
        }
        if let Some(remaining) = self.cooldown_remaining(kind, now) {
            return Err(PlacementError::CoolingDown {
                kind,
                remaining_ms: remaining.ceil() as u32,
            });
        }
        let cost = kind.def().cost;
        if !self.bank.can_afford(cost) {
            return Err(PlacementError::InsufficientSun {
                cost,
                available: self.bank.value(),
            });
        }
        Ok(())
    }

    /// Arm a plant kind for placement, or disarm it if already armed.
    ///
    /// Returns the kind now armed.
    ///
    /// # Errors
    ///
    /// Returns why the kind cannot be armed (run over, cooling down, too
    /// expensive). The selection is unchanged.
    pub fn select_plant(&mut self, kind: PlantKind, now: Millis) -> Result<Option<PlantKind>, PlacementError> {
        if self.selected == Some(kind) {
            self.selected = None;
            return Ok(None);
        }
        self.check_usable(kind, now)?;
        self.selected = Some(kind);
        Ok(self.selected)
    }

    /// Drop the armed plant kind.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Place a plant at input time `now`.
    ///
    /// Checks, in order: run not over, cell on the board, cell empty, global
    /// lockout elapsed, kind off cooldown, sun sufficient.
    ///
    /// # Errors
    ///
    /// Returns the first failed check; nothing is mutated on failure.
    pub fn place_plant(&mut self, kind: PlantKind, cell: Cell, now: Millis) -> Result<PlantId, PlacementError> {
        if self.state.is_terminal() {
            return Err(PlacementError::GameOver);
        }
        if !self.lawn.board.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if !self.lawn.board.is_free(cell) {
            return Err(PlacementError::Occupied(cell));
        }
        if now < self.blocked_until {
            return Err(PlacementError::PlacementLocked {
                remaining_ms: (self.blocked_until - now).ceil() as u32,
            });
        }
        self.check_usable(kind, now)?;

        let id = self
            .lawn
            .insert_plant(kind, cell, &self.rules)
            .ok_or(PlacementError::Occupied(cell))?;
        let cost = kind.def().cost;
        self.bank.spend(cost);
        self.last_placed[kind.index()] = Some(now);
        self.blocked_until = now + self.rules.placement_lockout_ms;
        self.stats.plants_placed += 1;
        self.stats.sun_spent += cost;

        debug!(id = id.0, %kind, %cell, balance = self.bank.value(), "plant placed");
        Ok(id)
    }

    /// Place the armed plant kind.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::NothingSelected`] if nothing is armed, or
    /// any error from [`Session::place_plant`].
    pub fn place_selected(&mut self, cell: Cell, now: Millis) -> Result<PlantId, PlacementError> {
        let kind = self.selected.ok_or(PlacementError::NothingSelected)?;
        self.place_plant(kind, cell, now)
    }

    /// Card state for one plant kind at input time `now`.
    #[must_use]
    pub fn card(&self, kind: PlantKind, now: Millis) -> CardStatus {
        let def = kind.def();
        let remaining = self.cooldown_remaining(kind, now).unwrap_or(0.0);
        let cooldown_ratio = if def.cooldown_ms > 0.0 {
            (remaining / def.cooldown_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
        CardStatus {
            kind,
            cost: def.cost,
            affordable: self.bank.can_afford(def.cost),
            ready: remaining <= 0.0,
            usable: self.check_usable(kind, now).is_ok(),
            cooldown_ratio,
            selected: self.selected == Some(kind),
        }
    }

    /// Read-only view for rendering.
    #[must_use]
    pub fn snapshot(&self, now: Millis) -> Snapshot {
        Snapshot::capture(self, now)
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Level being played.
    #[must_use]
    pub const fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Seed of the session's randomness.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Entities on the lawn.
    #[must_use]
    pub const fn lawn(&self) -> &Lawn {
        &self.lawn
    }

    /// The sun bank, for reading.
    #[must_use]
    pub const fn bank(&self) -> &SunBank {
        &self.bank
    }

    /// The sun bank, for subscribing listeners.
    pub fn bank_mut(&mut self) -> &mut SunBank {
        &mut self.bank
    }

    /// Current sun balance.
    #[must_use]
    pub const fn sun(&self) -> u32 {
        self.bank.value()
    }

    /// Level progress.
    #[must_use]
    pub const fn progress(&self) -> &LevelProgress {
        &self.progress
    }

    /// Run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Simulation time since the level started.
    #[must_use]
    pub const fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Armed plant kind.
    #[must_use]
    pub const fn selected(&self) -> Option<PlantKind> {
        self.selected
    }

    /// Totals so far.
    #[must_use]
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Mutable lawn access for scenario setup in tests and benches.
    #[doc(hidden)]
    pub fn lawn_mut(&mut self) -> &mut Lawn {
        &mut self.lawn
    }
}
