//! Plants, zombies, projectiles and sun pickups.

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Millis, PlantKind, PlantRole, Rules, ZombieKind};

/// Identifier of a placed plant. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantId(pub u32);

/// Identifier of a spawned zombie. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(pub u32);

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Bounds {
    /// Box of the given size centred on a point.
    #[must_use]
    pub fn centered(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x - width / 2.0,
            right: x + width / 2.0,
            top: y - height / 2.0,
            bottom: y + height / 2.0,
        }
    }

    /// Check if two boxes touch or overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// A plant standing in a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plant {
    /// Identifier.
    pub id: PlantId,
    /// Kind.
    pub kind: PlantKind,
    /// Cell the plant occupies.
    pub cell: Cell,
    /// Pixel x (cell centre).
    pub x: f64,
    /// Pixel y (cell centre).
    pub y: f64,
    /// Remaining health.
    pub hp: u32,
    /// Starting health.
    pub max_hp: u32,
    /// Time accumulated towards the next pickup (producers).
    pub production_timer: Millis,
    /// Time until the next shot may fire (shooters).
    pub attack_timer: Millis,
}

impl Plant {
    /// Create a plant in a cell.
    #[must_use]
    pub fn new(id: PlantId, kind: PlantKind, cell: Cell, rules: &Rules) -> Self {
        let def = kind.def();
        let (x, y) = rules.cell_center(cell);
        let attack_timer = match def.role {
            PlantRole::Shooter { interval_ms, .. } => interval_ms,
            PlantRole::Producer { .. } | PlantRole::Barrier => 0.0,
        };

        Self {
            id,
            kind,
            cell,
            x,
            y,
            hp: def.hp,
            max_hp: def.hp,
            production_timer: 0.0,
            attack_timer,
        }
    }

    /// Check if the plant is still standing.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

/// A zombie walking down a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zombie {
    /// Identifier (increasing in creation order).
    pub id: ZombieId,
    /// Kind.
    pub kind: ZombieKind,
    /// Lane.
    pub lane: u8,
    /// Pixel x of the centre.
    pub x: f64,
    /// Pixel y of the centre.
    pub y: f64,
    /// Remaining health.
    pub hp: u32,
    /// Starting health.
    pub max_hp: u32,
    /// Walking speed before slow.
    pub speed: f64,
    /// Damage per bite.
    pub damage: u32,
    /// Time between bites.
    pub attack_interval_ms: Millis,
    /// Time until the next bite.
    pub attack_timer: Millis,
    /// Simulation time until which the zombie is slowed.
    pub slowed_until: Millis,
    /// Whether the zombie is stopped eating a plant.
    pub eating: bool,
    /// Plant being eaten.
    pub target: Option<PlantId>,
    /// Hit box width.
    pub width: f64,
    /// Hit box height.
    pub height: f64,
}

impl Zombie {
    /// Spawn a zombie just past the right edge of a lane.
    ///
    /// `speed_multiplier` scales the kind's base speed.
    #[must_use]
    pub fn spawn(id: ZombieId, kind: ZombieKind, lane: u8, speed_multiplier: f64, rules: &Rules) -> Self {
        let def = kind.def();
        Self {
            id,
            kind,
            lane,
            x: rules.board_width() + rules.zombie_spawn_offset,
            y: rules.lane_center(lane),
            hp: def.hp,
            max_hp: def.hp,
            speed: def.speed * speed_multiplier,
            damage: def.damage,
            attack_interval_ms: def.attack_interval_ms,
            attack_timer: 0.0,
            slowed_until: 0.0,
            eating: false,
            target: None,
            width: rules.zombie_width,
            height: rules.zombie_height,
        }
    }

    /// Check if the zombie is still walking.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Check if a slow effect is active at `now`.
    #[must_use]
    pub fn is_slowed(&self, now: Millis) -> bool {
        self.slowed_until > now
    }

    /// Walking speed at `now`, including slow.
    #[must_use]
    pub fn current_speed(&self, now: Millis, slow_factor: f64) -> f64 {
        if self.is_slowed(now) {
            self.speed * slow_factor
        } else {
            self.speed
        }
    }

    /// Extend the slow effect to at least `until`.
    pub fn chill(&mut self, until: Millis) {
        self.slowed_until = self.slowed_until.max(until);
    }

    /// Start eating a plant; the first bite lands one interval later.
    pub fn start_eating(&mut self, plant: PlantId) {
        self.eating = true;
        self.target = Some(plant);
        self.attack_timer = self.attack_interval_ms;
    }

    /// Stop eating and forget the target.
    pub fn stop_eating(&mut self) {
        self.eating = false;
        self.target = None;
    }

    /// Leftmost x of the hit box (the edge facing the house).
    #[must_use]
    pub fn leading_edge(&self) -> f64 {
        self.x - self.width / 2.0
    }

    /// Hit box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.x, self.y, self.width, self.height)
    }
}

/// A projectile flying right along a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Lane.
    pub lane: u8,
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Speed.
    pub speed: f64,
    /// Damage on hit.
    pub damage: u32,
    /// Slow duration applied on hit.
    pub slow_ms: Option<Millis>,
    /// Edge length.
    pub size: f64,
}

impl Default for Projectile {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            lane: 0,
            x: 0.0,
            y: 0.0,
            speed: rules.projectile_speed,
            damage: 20,
            slow_ms: None,
            size: rules.projectile_size,
        }
    }
}

impl Projectile {
    /// Hit box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.x, self.y, self.size, self.size)
    }
}

/// A collectible sun on the lawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPickup {
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Y at which a falling pickup comes to rest.
    pub rest_y: f64,
    /// Sun credited when collected.
    pub value: u32,
    /// Time left before the pickup fades.
    pub life_ms: Millis,
    /// Whether the pickup has stopped falling.
    pub stationary: bool,
}

impl SunPickup {
    /// A pickup that appears in place (produced by a plant).
    #[must_use]
    pub fn resting(x: f64, y: f64, value: u32, life_ms: Millis) -> Self {
        Self {
            x,
            y,
            rest_y: y,
            value,
            life_ms,
            stationary: true,
        }
    }

    /// A pickup falling from `y` towards `rest_y`.
    #[must_use]
    pub fn falling(x: f64, y: f64, rest_y: f64, value: u32, life_ms: Millis) -> Self {
        Self {
            x,
            y,
            rest_y,
            value,
            life_ms,
            stationary: false,
        }
    }

    /// Advance fall and lifetime. Returns `false` once the pickup expired.
    pub fn advance(&mut self, delta: Millis, fall_speed: f64) -> bool {
        if !self.stationary {
            self.y += fall_speed * delta;
            if self.y >= self.rest_y {
                self.y = self.rest_y;
                self.stationary = true;
            }
        }
        self.life_ms -= delta;
        self.life_ms > 0.0
    }

    /// Check if a point lies within `radius` of the pickup.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64, radius: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_creation() {
        let rules = Rules::default();
        let plant = Plant::new(PlantId(1), PlantKind::Peashooter, Cell::new(1, 2), &rules);
        assert!((plant.x - 250.0).abs() < f64::EPSILON);
        assert!((plant.y - 150.0).abs() < f64::EPSILON);
        assert_eq!(plant.hp, 300);
        assert!((plant.attack_timer - 1500.0).abs() < f64::EPSILON);

        let nut = Plant::new(PlantId(2), PlantKind::WallNut, Cell::new(0, 0), &rules);
        assert_eq!(nut.max_hp, 1600);
    }

    #[test]
    fn test_damage_saturates() {
        let rules = Rules::default();
        let mut plant = Plant::new(PlantId(1), PlantKind::Sunflower, Cell::new(0, 0), &rules);
        plant.take_damage(1000);
        assert_eq!(plant.hp, 0);
        assert!(!plant.is_alive());
    }

    #[test]
    fn test_zombie_spawn_position() {
        let rules = Rules::default();
        let zombie = Zombie::spawn(ZombieId(1), ZombieKind::Basic, 3, 1.0, &rules);
        assert!((zombie.x - 920.0).abs() < f64::EPSILON);
        assert!((zombie.y - 350.0).abs() < f64::EPSILON);
        assert!((zombie.leading_edge() - 880.0).abs() < f64::EPSILON);
        assert!(!zombie.eating);
    }

    #[test]
    fn test_zombie_slow() {
        let rules = Rules::default();
        let mut zombie = Zombie::spawn(ZombieId(1), ZombieKind::Basic, 0, 1.0, &rules);
        assert!((zombie.current_speed(0.0, 0.5) - 0.025).abs() < 1e-12);

        zombie.chill(4000.0);
        assert!((zombie.current_speed(100.0, 0.5) - 0.0125).abs() < 1e-12);

        // A shorter chill never shortens an active one
        zombie.chill(2000.0);
        assert!((zombie.slowed_until - 4000.0).abs() < f64::EPSILON);
        assert!(!zombie.is_slowed(4000.0));
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::centered(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::centered(9.0, 0.0, 10.0, 10.0);
        let c = Bounds::centered(20.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_sun_falls_then_rests() {
        let mut sun = SunPickup::falling(100.0, -30.0, 70.0, 25, 8000.0);
        assert!(sun.advance(1000.0, 0.05));
        assert!((sun.y - 20.0).abs() < 1e-9);
        assert!(!sun.stationary);

        assert!(sun.advance(2000.0, 0.05));
        assert!((sun.y - 70.0).abs() < f64::EPSILON);
        assert!(sun.stationary);

        assert!(!sun.advance(5000.0, 0.05));
    }

    #[test]
    fn test_sun_contains() {
        let sun = SunPickup::resting(100.0, 100.0, 25, 8000.0);
        assert!(sun.contains(120.0, 110.0, 30.0));
        assert!(!sun.contains(140.0, 100.0, 30.0));
    }
}
