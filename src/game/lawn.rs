//! Entity storage for one run: the board plus every live entity.

use crate::game::{
    Board, Cell, Plant, PlantId, PlantKind, Projectile, ProjectilePool, Rules, SunPickup, Zombie,
    ZombieId, ZombieKind,
};

/// Everything physically on the lawn.
///
/// Collections keep creation order; the combat resolver relies on it for
/// tie-breaking.
#[derive(Debug)]
pub struct Lawn {
    /// Occupancy grid.
    pub board: Board,
    /// Placed plants.
    pub plants: Vec<Plant>,
    /// Live zombies, oldest first.
    pub zombies: Vec<Zombie>,
    /// Projectiles in flight.
    pub projectiles: Vec<Projectile>,
    /// Recycled projectiles.
    pub pool: ProjectilePool,
    /// Sun pickups on the lawn.
    pub suns: Vec<SunPickup>,
    /// Next plant id.
    next_plant: u32,
    /// Next zombie id.
    next_zombie: u32,
}

impl Lawn {
    /// Create an empty lawn with the given board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            plants: Vec::new(),
            zombies: Vec::new(),
            projectiles: Vec::new(),
            pool: ProjectilePool::new(),
            suns: Vec::new(),
            next_plant: 1,
            next_zombie: 1,
        }
    }

    /// Remove every entity and empty the pool.
    pub fn clear(&mut self) {
        self.board.clear();
        self.plants.clear();
        self.zombies.clear();
        self.projectiles.clear();
        self.pool.clear();
        self.suns.clear();
        self.next_plant = 1;
        self.next_zombie = 1;
    }

    /// Look up a plant.
    #[must_use]
    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// Plant standing in a cell.
    #[must_use]
    pub fn plant_at(&self, cell: Cell) -> Option<&Plant> {
        self.board.get(cell).and_then(|id| self.plant(id))
    }

    /// Create a plant in a free cell.
    ///
    /// Returns `None` if the cell is out of bounds or occupied.
    pub fn insert_plant(&mut self, kind: PlantKind, cell: Cell, rules: &Rules) -> Option<PlantId> {
        let id = PlantId(self.next_plant);
        if !self.board.occupy(cell, id) {
            return None;
        }
        self.next_plant += 1;
        self.plants.push(Plant::new(id, kind, cell, rules));
        Some(id)
    }

    /// Remove a plant, free its cell and release any zombie eating it.
    pub fn remove_plant(&mut self, id: PlantId) -> Option<Plant> {
        let index = self.plants.iter().position(|p| p.id == id)?;
        let plant = self.plants.remove(index);
        if self.board.get(plant.cell) == Some(id) {
            self.board.vacate(plant.cell);
        }
        for zombie in &mut self.zombies {
            if zombie.target == Some(id) {
                zombie.stop_eating();
            }
        }
        Some(plant)
    }

    /// Spawn a zombie at the right edge of a lane.
    pub fn spawn_zombie(
        &mut self,
        kind: ZombieKind,
        lane: u8,
        speed_multiplier: f64,
        rules: &Rules,
    ) -> ZombieId {
        let id = ZombieId(self.next_zombie);
        self.next_zombie += 1;
        self.zombies
            .push(Zombie::spawn(id, kind, lane, speed_multiplier, rules));
        id
    }

    /// Collect the newest pickup within `radius` of a point.
    ///
    /// Returns the pickup's value.
    pub fn take_sun_at(&mut self, x: f64, y: f64, radius: f64) -> Option<u32> {
        let index = self.suns.iter().rposition(|s| s.contains(x, y, radius))?;
        Some(self.suns.remove(index).value)
    }
}
