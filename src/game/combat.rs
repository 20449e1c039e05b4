//! Per-tick combat resolution.
//!
//! The session calls these phases in order once per tick:
//!
//! 1. [`advance_projectiles`] moves shots and culls those leaving the lawn.
//! 2. [`update_plants`] runs production and firing.
//! 3. [`update_zombies`] walks and bites; reports a breach of the house.
//! 4. [`resolve_hits`] applies projectile hits.
//! 5. [`remove_casualties`] clears dead zombies and plants.
//! 6. [`advance_suns`] drops and expires pickups.
//!
//! Everything is lane-scoped and O(projectiles × zombies) at worst, which
//! is fine for the few dozen entities a lawn holds.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::game::{
    Board, Cell, Lawn, Millis, PlantId, PlantRole, Projectile, Rules, SunPickup, Zombie,
};

/// Offset of a shot's spawn point from the plant centre.
const MUZZLE_OFFSET: (f64, f64) = (24.0, -12.0);

/// Height above the plant centre at which produced sun appears.
const PRODUCED_SUN_LIFT: f64 = 20.0;

/// Counters describing one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Zombies spawned by the level driver.
    pub spawned: u32,
    /// Projectiles fired.
    pub shots_fired: u32,
    /// Projectiles that hit a zombie.
    pub hits: u32,
    /// Bites landed on plants.
    pub bites: u32,
    /// Pickups produced by plants.
    pub suns_produced: u32,
    /// Pickups dropped from the sky.
    pub suns_dropped: u32,
    /// Pickups that faded uncollected.
    pub suns_expired: u32,
    /// Zombies removed with no health left.
    pub zombies_killed: u32,
    /// Plants removed with no health left.
    pub plants_lost: u32,
    /// A zombie reached the house.
    pub breached: bool,
}

/// Check if any live zombie in `lane` stands to the right of `x`.
#[must_use]
pub fn zombie_ahead(zombies: &[Zombie], lane: u8, x: f64) -> bool {
    zombies
        .iter()
        .any(|z| z.lane == lane && z.is_alive() && z.x > x)
}

/// Plant registered in the cell a zombie is walking into.
#[must_use]
pub fn plant_in_front(board: &Board, rules: &Rules, zombie: &Zombie) -> Option<PlantId> {
    let col = ((zombie.x - rules.cell_size / 2.0) / rules.cell_size).floor();
    if col < 0.0 || col >= f64::from(board.cols()) {
        return None;
    }
    board.get(Cell::new(zombie.lane, col as u8))
}

/// Index of the zombie a projectile strikes, if any.
///
/// The first live zombie in creation order whose lane band contains the
/// projectile and whose leading edge the projectile has reached wins;
/// proximity does not matter. There is no far bound, so a shot that moved
/// past a zombie within one long tick still connects.
#[must_use]
pub fn find_target(zombies: &[Zombie], projectile: &Projectile, lane_tolerance: f64) -> Option<usize> {
    zombies.iter().position(|z| {
        z.is_alive() && (z.y - projectile.y).abs() < lane_tolerance && projectile.x >= z.leading_edge()
    })
}

/// Move projectiles and return those past the right edge to the pool.
pub fn advance_projectiles(lawn: &mut Lawn, rules: &Rules, delta: Millis) {
    let limit = rules.board_width() + rules.projectile_cull_margin;
    let mut i = 0;
    while i < lawn.projectiles.len() {
        let projectile = &mut lawn.projectiles[i];
        projectile.x += projectile.speed * delta;
        if projectile.x > limit {
            let spent = lawn.projectiles.remove(i);
            lawn.pool.release(spent);
        } else {
            i += 1;
        }
    }
}

/// Run plant timers: producers emit pickups, shooters fire at zombies ahead.
///
/// Production keeps the remainder of its timer, so any elapsed time yields
/// exactly `floor(elapsed / interval)` pickups regardless of tick size.
pub fn update_plants(lawn: &mut Lawn, rules: &Rules, delta: Millis, report: &mut TickReport) {
    let Lawn {
        plants,
        zombies,
        projectiles,
        pool,
        suns,
        ..
    } = lawn;

    for plant in plants.iter_mut().filter(|p| p.is_alive()) {
        match plant.kind.def().role {
            PlantRole::Producer { interval_ms, value } => {
                plant.production_timer += delta;
                while plant.production_timer >= interval_ms {
                    plant.production_timer -= interval_ms;
                    suns.push(SunPickup::resting(
                        plant.x,
                        plant.y - PRODUCED_SUN_LIFT,
                        value,
                        rules.sun_lifetime_ms,
                    ));
                    report.suns_produced += 1;
                }
            }
            PlantRole::Shooter { interval_ms, shot } => {
                plant.attack_timer -= delta;
                if plant.attack_timer <= 0.0 && zombie_ahead(zombies, plant.cell.row, plant.x) {
                    let mut projectile = pool.acquire();
                    projectile.lane = plant.cell.row;
                    projectile.x = plant.x + MUZZLE_OFFSET.0;
                    projectile.y = plant.y + MUZZLE_OFFSET.1;
                    projectile.speed = rules.projectile_speed;
                    projectile.damage = shot.damage;
                    projectile.slow_ms = shot.slow_ms;
                    projectile.size = rules.projectile_size;
                    projectiles.push(projectile);

                    plant.attack_timer = interval_ms;
                    report.shots_fired += 1;
                }
            }
            PlantRole::Barrier => {}
        }
    }
}

/// Walk or bite every zombie.
///
/// Bite timers carry their remainder, so a zombie eating for `t` ms lands
/// exactly `floor(t / interval)` bites. Stops at the first zombie that
/// crosses the left edge and sets [`TickReport::breached`].
pub fn update_zombies(
    lawn: &mut Lawn,
    rules: &Rules,
    now: Millis,
    delta: Millis,
    report: &mut TickReport,
) {
    let Lawn {
        board,
        plants,
        zombies,
        ..
    } = lawn;

    for zombie in zombies.iter_mut().filter(|z| z.is_alive()) {
        if zombie.eating {
            zombie.attack_timer -= delta;
            while zombie.eating && zombie.attack_timer <= 0.0 {
                let target = plant_in_front(board, rules, zombie)
                    .and_then(|id| plants.iter_mut().find(|p| p.id == id && p.is_alive()));
                match target {
                    Some(plant) => {
                        plant.take_damage(zombie.damage);
                        zombie.target = Some(plant.id);
                        zombie.attack_timer += zombie.attack_interval_ms;
                        report.bites += 1;
                    }
                    None => zombie.stop_eating(),
                }
            }
        } else {
            zombie.x -= zombie.current_speed(now, rules.slow_factor) * delta;
            let blocker = plant_in_front(board, rules, zombie)
                .filter(|id| plants.iter().any(|p| p.id == *id && p.is_alive()));
            if let Some(id) = blocker {
                zombie.start_eating(id);
            }
        }

        if zombie.x < 0.0 {
            report.breached = true;
            return;
        }
    }
}

/// Apply projectile hits and recycle the projectiles that landed.
pub fn resolve_hits(lawn: &mut Lawn, rules: &Rules, now: Millis, report: &mut TickReport) {
    let tolerance = rules.cell_size / 2.0;
    let mut i = 0;
    while i < lawn.projectiles.len() {
        let Some(index) = find_target(&lawn.zombies, &lawn.projectiles[i], tolerance) else {
            i += 1;
            continue;
        };

        let projectile = lawn.projectiles.remove(i);
        let zombie = &mut lawn.zombies[index];
        zombie.take_damage(projectile.damage);
        if let Some(slow_ms) = projectile.slow_ms {
            zombie.chill(now + slow_ms);
        }
        report.hits += 1;
        lawn.pool.release(projectile);
    }
}

/// Remove zombies and plants with no health left.
pub fn remove_casualties(lawn: &mut Lawn, report: &mut TickReport) {
    let before = lawn.zombies.len();
    lawn.zombies.retain(Zombie::is_alive);
    report.zombies_killed += (before - lawn.zombies.len()) as u32;

    let fallen: Vec<PlantId> = lawn
        .plants
        .iter()
        .filter(|p| !p.is_alive())
        .map(|p| p.id)
        .collect();
    for id in fallen {
        if lawn.remove_plant(id).is_some() {
            report.plants_lost += 1;
        }
    }
}

/// Let falling pickups settle and drop expired ones.
pub fn advance_suns(lawn: &mut Lawn, rules: &Rules, delta: Millis, report: &mut TickReport) {
    let before = lawn.suns.len();
    lawn.suns
        .retain_mut(|sun| sun.advance(delta, rules.sun_fall_speed));
    report.suns_expired += (before - lawn.suns.len()) as u32;
}
