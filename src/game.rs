//! Simulation core.
//!
//! A [`Session`] plays one level on a lawn of lanes and columns:
//! - Plants are placed into cells for sun and defend their lane
//! - Zombies spawn at the right edge and walk left, eating what blocks them
//! - Projectiles fly right and hit the first zombie they overlap
//! - Sun drops from the sky and from producers and is collected by hand
//!
//! Time is in milliseconds and positions in pixels, both as `f64`.

mod board;
mod catalog;
mod combat;
mod economy;
mod entities;
mod invariants;
mod lawn;
mod pool;
mod rules;
mod session;
mod snapshot;
mod spawner;
mod waves;

/// Milliseconds of simulation or input time.
pub type Millis = f64;

pub use board::{Board, Cell};
pub use catalog::{PlantDef, PlantKind, PlantRole, ShotDef, ZombieDef, ZombieKind};
pub use combat::{
    TickReport, advance_projectiles, advance_suns, find_target, plant_in_front, remove_casualties,
    resolve_hits, update_plants, update_zombies, zombie_ahead,
};
pub use economy::{SubscriptionId, SunBank, SunListener};
pub use entities::{Bounds, Plant, PlantId, Projectile, SunPickup, Zombie, ZombieId};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use lawn::Lawn;
pub use pool::ProjectilePool;
pub use rules::{Rules, SUNLIGHT_BONUS_UNIT};
pub use session::{RunState, RunStats, Session};
pub use snapshot::{CardStatus, PlantView, ProjectileView, Snapshot, SunView, ZombieView};
pub use spawner::TimedSpawner;
pub use waves::{LevelProgress, ProgressUpdate, SpawnOrder};
