//! Plant and zombie definitions.
//!
//! Each kind maps to an immutable definition record. Behaviour differences
//! between plants are expressed by [`PlantRole`], so the simulation
//! dispatches on a closed set of variants instead of per-kind types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Millis;

/// What a plant does each tick besides standing in the way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlantRole {
    /// Emits a sun pickup every `interval_ms`.
    Producer {
        /// Production period.
        interval_ms: Millis,
        /// Value of each pickup.
        value: u32,
    },
    /// Fires down its lane whenever a zombie is ahead.
    Shooter {
        /// Cooldown between shots.
        interval_ms: Millis,
        /// Projectile fired.
        shot: ShotDef,
    },
    /// Only blocks.
    Barrier,
}

/// Projectile parameters for a shooter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotDef {
    /// Damage per hit.
    pub damage: u32,
    /// Slow applied on hit, if any.
    pub slow_ms: Option<Millis>,
}

/// Immutable definition of a plant kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantDef {
    /// Display name.
    pub name: &'static str,
    /// Sun cost.
    pub cost: u32,
    /// Minimum time between two placements of this kind.
    pub cooldown_ms: Millis,
    /// Starting health.
    pub hp: u32,
    /// Tick behaviour.
    pub role: PlantRole,
}

/// Every plant that can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantKind {
    /// Produces sun.
    Sunflower,
    /// Shoots peas.
    Peashooter,
    /// Shoots peas that slow.
    #[serde(rename = "snowpea")]
    SnowPea,
    /// Tough blocker.
    #[serde(rename = "wallnut")]
    WallNut,
}

const SUNFLOWER: PlantDef = PlantDef {
    name: "Sunflower",
    cost: 50,
    cooldown_ms: 7500.0,
    hp: 300,
    role: PlantRole::Producer {
        interval_ms: 24_000.0,
        value: 25,
    },
};

const PEASHOOTER: PlantDef = PlantDef {
    name: "Pea Shooter",
    cost: 100,
    cooldown_ms: 7500.0,
    hp: 300,
    role: PlantRole::Shooter {
        interval_ms: 1500.0,
        shot: ShotDef {
            damage: 20,
            slow_ms: None,
        },
    },
};

const SNOW_PEA: PlantDef = PlantDef {
    name: "Snow Pea",
    cost: 175,
    cooldown_ms: 8500.0,
    hp: 300,
    role: PlantRole::Shooter {
        interval_ms: 1700.0,
        shot: ShotDef {
            damage: 20,
            slow_ms: Some(4000.0),
        },
    },
};

const WALL_NUT: PlantDef = PlantDef {
    name: "Wall-Nut",
    cost: 50,
    cooldown_ms: 15_000.0,
    hp: 1600,
    role: PlantRole::Barrier,
};

impl PlantKind {
    /// All plant kinds, in card order.
    pub const ALL: [PlantKind; 4] = [
        PlantKind::Sunflower,
        PlantKind::Peashooter,
        PlantKind::SnowPea,
        PlantKind::WallNut,
    ];

    /// Number of plant kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Definition record for this kind.
    #[must_use]
    pub const fn def(self) -> &'static PlantDef {
        match self {
            PlantKind::Sunflower => &SUNFLOWER,
            PlantKind::Peashooter => &PEASHOOTER,
            PlantKind::SnowPea => &SNOW_PEA,
            PlantKind::WallNut => &WALL_NUT,
        }
    }

    /// Position of this kind in [`PlantKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

/// Immutable definition of a zombie kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieDef {
    /// Display name.
    pub name: &'static str,
    /// Starting health.
    pub hp: u32,
    /// Walking speed.
    pub speed: f64,
    /// Damage per bite.
    pub damage: u32,
    /// Time between bites.
    pub attack_interval_ms: Millis,
}

/// Every zombie that can be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZombieKind {
    /// Plain zombie.
    Basic,
    /// Wears a traffic cone.
    Cone,
    /// Wears a bucket.
    Bucket,
}

const BASIC: ZombieDef = ZombieDef {
    name: "Zombie",
    hp: 200,
    speed: 0.025,
    damage: 40,
    attack_interval_ms: 1400.0,
};

const CONEHEAD: ZombieDef = ZombieDef {
    name: "Conehead Zombie",
    hp: 370,
    speed: 0.026,
    damage: 45,
    attack_interval_ms: 1300.0,
};

const BUCKETHEAD: ZombieDef = ZombieDef {
    name: "Buckethead Zombie",
    hp: 600,
    speed: 0.027,
    damage: 45,
    attack_interval_ms: 1200.0,
};

impl ZombieKind {
    /// All zombie kinds.
    pub const ALL: [ZombieKind; 3] = [ZombieKind::Basic, ZombieKind::Cone, ZombieKind::Bucket];

    /// Definition record for this kind.
    #[must_use]
    pub const fn def(self) -> &'static ZombieDef {
        match self {
            ZombieKind::Basic => &BASIC,
            ZombieKind::Cone => &CONEHEAD,
            ZombieKind::Bucket => &BUCKETHEAD,
        }
    }
}

impl fmt::Display for ZombieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}
