//! Read-only views of a session for renderers.

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Millis, PlantId, PlantKind, RunState, Session, ZombieId, ZombieKind};

/// Card state of one plant kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardStatus {
    /// Plant kind.
    pub kind: PlantKind,
    /// Sun cost.
    pub cost: u32,
    /// Balance covers the cost.
    pub affordable: bool,
    /// Cooldown elapsed.
    pub ready: bool,
    /// Can be armed right now.
    pub usable: bool,
    /// Fraction of the cooldown still to run, in `[0, 1]`.
    pub cooldown_ratio: f64,
    /// Currently armed.
    pub selected: bool,
}

/// A plant as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantView {
    /// Identifier.
    pub id: PlantId,
    /// Kind.
    pub kind: PlantKind,
    /// Cell.
    pub cell: Cell,
    /// Health left.
    pub hp: u32,
    /// Starting health.
    pub max_hp: u32,
}

/// A zombie as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZombieView {
    /// Identifier.
    pub id: ZombieId,
    /// Kind.
    pub kind: ZombieKind,
    /// Lane.
    pub lane: u8,
    /// Pixel x of the centre.
    pub x: f64,
    /// Health left.
    pub hp: u32,
    /// Starting health.
    pub max_hp: u32,
    /// Stopped at a plant.
    pub eating: bool,
    /// Under a slow effect.
    pub slowed: bool,
}

/// A projectile as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    /// Lane.
    pub lane: u8,
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Slows on hit.
    pub slowing: bool,
}

/// A sun pickup as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunView {
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Value.
    pub value: u32,
    /// Still falling.
    pub falling: bool,
    /// Time left before it fades.
    pub life_ms: Millis,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Level id.
    pub level_id: u32,
    /// Level name.
    pub level_name: String,
    /// Run state.
    pub state: RunState,
    /// Sun balance.
    pub sun: u32,
    /// Current wave, 1-based.
    pub wave: usize,
    /// Total waves.
    pub total_waves: usize,
    /// Simulation time.
    pub elapsed_ms: Millis,
    /// Lanes.
    pub rows: u8,
    /// Columns.
    pub cols: u8,
    /// Cell edge length in pixels.
    pub cell_size: f64,
    /// Plants.
    pub plants: Vec<PlantView>,
    /// Zombies.
    pub zombies: Vec<ZombieView>,
    /// Projectiles.
    pub projectiles: Vec<ProjectileView>,
    /// Sun pickups.
    pub suns: Vec<SunView>,
    /// One card per plant kind, in card order.
    pub cards: Vec<CardStatus>,
    /// Armed plant kind.
    pub selected: Option<PlantKind>,
}

impl Snapshot {
    /// Capture a session at input time `now` (used for card cooldowns).
    #[must_use]
    pub fn capture(session: &Session, now: Millis) -> Self {
        let lawn = session.lawn();
        let rules = session.rules();
        let level = session.level();
        let elapsed = session.elapsed_ms();

        Self {
            level_id: level.id,
            level_name: level.name.clone(),
            state: session.state(),
            sun: session.sun(),
            wave: session.progress().display_wave(&level.plan),
            total_waves: level.plan.wave_count(),
            elapsed_ms: elapsed,
            rows: rules.rows,
            cols: rules.cols,
            cell_size: rules.cell_size,
            plants: lawn
                .plants
                .iter()
                .map(|p| PlantView {
                    id: p.id,
                    kind: p.kind,
                    cell: p.cell,
                    hp: p.hp,
                    max_hp: p.max_hp,
                })
                .collect(),
            zombies: lawn
                .zombies
                .iter()
                .map(|z| ZombieView {
                    id: z.id,
                    kind: z.kind,
                    lane: z.lane,
                    x: z.x,
                    hp: z.hp,
                    max_hp: z.max_hp,
                    eating: z.eating,
                    slowed: z.is_slowed(elapsed),
                })
                .collect(),
            projectiles: lawn
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    lane: p.lane,
                    x: p.x,
                    y: p.y,
                    slowing: p.slow_ms.is_some(),
                })
                .collect(),
            suns: lawn
                .suns
                .iter()
                .map(|s| SunView {
                    x: s.x,
                    y: s.y,
                    value: s.value,
                    falling: !s.stationary,
                    life_ms: s.life_ms,
                })
                .collect(),
            cards: PlantKind::ALL
                .iter()
                .map(|&kind| session.card(kind, now))
                .collect(),
            selected: session.selected(),
        }
    }

    /// Plant standing in a cell.
    #[must_use]
    pub fn plant_at(&self, cell: Cell) -> Option<&PlantView> {
        self.plants.iter().find(|p| p.cell == cell)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::{Cell, PlantKind, Rules, RunState, Session};
    use crate::level::LevelSet;

    #[test]
    fn test_snapshot_reflects_session() {
        let level = LevelSet::builtin().get(2).unwrap().clone();
        let mut session = Session::new(level, Rules::default(), 3).unwrap();
        session
            .place_plant(PlantKind::Sunflower, Cell::new(4, 0), 0.0)
            .unwrap();
        session.start();
        session.advance(16.0);

        let snap = session.snapshot(100.0);
        assert_eq!(snap.level_name, "Day 2");
        assert_eq!(snap.state, RunState::Running);
        assert_eq!(snap.sun, 100);
        assert_eq!(snap.wave, 1);
        assert_eq!(snap.total_waves, 2);
        assert_eq!(snap.zombies.len(), 1);
        assert_eq!(snap.cards.len(), PlantKind::ALL.len());
        assert!(!snap.cards[0].ready);
        assert_eq!(snap.plant_at(Cell::new(4, 0)).unwrap().kind, PlantKind::Sunflower);
    }

    #[test]
    fn test_snapshot_serializes() {
        let level = LevelSet::builtin().get(1).unwrap().clone();
        let session = Session::new(level, Rules::default(), 3).unwrap();
        let json = serde_json::to_string(&session.snapshot(0.0)).unwrap();
        assert!(json.contains("\"state\":\"ready\""));
    }
}
