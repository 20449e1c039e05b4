//! Scripted players for headless runs.
//!
//! A [`Strategy`] stands in for pointer input: between ticks it may collect
//! sun and place plants through the same session methods a UI would call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Millis, PlantKind, PlantRole, Session};

/// A scripted player.
pub trait Strategy: Send {
    /// Short name for reports.
    fn name(&self) -> &'static str;

    /// Act on the session at input time `now`.
    fn act(&mut self, session: &mut Session, now: Millis);
}

/// Never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Strategy for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn act(&mut self, _session: &mut Session, _now: Millis) {}
}

/// Picks up every sun pickup it can reach and plants nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collector;

impl Strategy for Collector {
    fn name(&self) -> &'static str {
        "collector"
    }

    fn act(&mut self, session: &mut Session, _now: Millis) {
        collect_all(session);
    }
}

fn collect_all(session: &mut Session) -> u32 {
    let spots: Vec<(f64, f64)> = session.lawn().suns.iter().map(|s| (s.x, s.y)).collect();
    spots
        .into_iter()
        .filter_map(|(x, y)| session.collect_sun_at(x, y))
        .sum()
}

/// A simple economy-first player.
///
/// Keeps one producer per lane in the first column, answers every
/// threatened lane with a shooter, and walls lanes where zombies get close.
#[derive(Debug, Clone, Copy)]
pub struct Gardener {
    /// Producers to keep before anything else, when no lane is threatened.
    pub producers: u8,
    /// Zombies left of this x prompt a wall in their lane.
    pub wall_threshold: f64,
    /// Sun kept back once the basics are in place.
    pub reserve: u32,
}

impl Default for Gardener {
    fn default() -> Self {
        Self {
            producers: 5,
            wall_threshold: 600.0,
            reserve: 50,
        }
    }
}

/// Per-lane summary a gardener decides on.
#[derive(Debug, Clone, Copy, Default)]
struct LaneView {
    zombies: usize,
    nearest_x: Option<f64>,
    shooters: usize,
    walls: usize,
}

impl Gardener {
    fn lanes(session: &Session) -> Vec<LaneView> {
        let lawn = session.lawn();
        let mut lanes = vec![LaneView::default(); usize::from(lawn.board.rows())];

        for zombie in lawn.zombies.iter().filter(|z| z.is_alive()) {
            if let Some(view) = lanes.get_mut(usize::from(zombie.lane)) {
                view.zombies += 1;
                view.nearest_x = Some(view.nearest_x.map_or(zombie.x, |x: f64| x.min(zombie.x)));
            }
        }
        for plant in &lawn.plants {
            let Some(view) = lanes.get_mut(usize::from(plant.cell.row)) else {
                continue;
            };
            match plant.kind.def().role {
                PlantRole::Shooter { .. } => view.shooters += 1,
                PlantRole::Barrier => view.walls += 1,
                PlantRole::Producer { .. } => {}
            }
        }
        lanes
    }

    /// First free cell in a lane between two columns, scanning left to right.
    fn free_cell(session: &Session, lane: u8, cols: std::ops::RangeInclusive<u8>) -> Option<Cell> {
        let board = &session.lawn().board;
        cols.map(|col| Cell::new(lane, col))
            .find(|&cell| board.is_free(cell))
    }

    fn try_place(session: &mut Session, kind: PlantKind, cell: Option<Cell>, now: Millis) -> bool {
        cell.is_some_and(|cell| session.place_plant(kind, cell, now).is_ok())
    }

    fn plan(&self, session: &mut Session, now: Millis) -> bool {
        let lanes = Self::lanes(session);
        let cols = session.lawn().board.cols();
        let last_col = cols.saturating_sub(1);

        // Threatened lanes, nearest zombie first
        let mut threatened: Vec<(u8, LaneView)> = (0u8..)
            .zip(lanes.iter().copied())
            .filter(|(_, view)| view.zombies > 0)
            .collect();
        threatened.sort_by(|a, b| {
            let ax = a.1.nearest_x.unwrap_or(f64::MAX);
            let bx = b.1.nearest_x.unwrap_or(f64::MAX);
            ax.total_cmp(&bx)
        });

        for &(lane, view) in &threatened {
            if view.shooters == 0 {
                let cell = Self::free_cell(session, lane, 1.min(last_col)..=last_col.min(3));
                if Self::try_place(session, PlantKind::Peashooter, cell, now) {
                    return true;
                }
            }
            let close = view.nearest_x.is_some_and(|x| x < self.wall_threshold);
            if close && view.walls == 0 {
                let cell = Self::free_cell(session, lane, 4.min(last_col)..=last_col.min(5));
                if Self::try_place(session, PlantKind::WallNut, cell, now) {
                    return true;
                }
            }
        }

        let producers = session
            .lawn()
            .plants
            .iter()
            .filter(|p| matches!(p.kind.def().role, PlantRole::Producer { .. }))
            .count();
        if producers < usize::from(self.producers) {
            let lane = (0..session.lawn().board.rows()).find(|&row| session.lawn().board.is_free(Cell::new(row, 0)));
            if Self::try_place(session, PlantKind::Sunflower, lane.map(|row| Cell::new(row, 0)), now) {
                return true;
            }
            if threatened.is_empty() {
                return false;
            }
        }

        // Reinforce the busiest lane once the economy runs
        let Some(&(lane, _)) = threatened.iter().max_by_key(|(_, view)| view.zombies) else {
            return false;
        };
        let kind = if session.sun() >= PlantKind::SnowPea.def().cost + self.reserve {
            PlantKind::SnowPea
        } else if session.sun() >= PlantKind::Peashooter.def().cost + self.reserve {
            PlantKind::Peashooter
        } else {
            return false;
        };
        let cell = Self::free_cell(session, lane, 1.min(last_col)..=last_col.min(3));
        Self::try_place(session, kind, cell, now)
    }
}

impl Strategy for Gardener {
    fn name(&self) -> &'static str {
        "gardener"
    }

    fn act(&mut self, session: &mut Session, now: Millis) {
        collect_all(session);
        self.plan(session, now);
    }
}

/// Selectable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`Idle`].
    Idle,
    /// [`Collector`].
    Collector,
    /// [`Gardener`] with default settings.
    Gardener,
}

impl StrategyKind {
    /// Every strategy, in menu order.
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Idle, StrategyKind::Collector, StrategyKind::Gardener];

    /// Build a fresh instance.
    #[must_use]
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Idle => Box::new(Idle),
            StrategyKind::Collector => Box::new(Collector),
            StrategyKind::Gardener => Box::new(Gardener::default()),
        }
    }

    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Idle => "idle",
            StrategyKind::Collector => "collector",
            StrategyKind::Gardener => "gardener",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown strategy '{s}' (expected one of: {})", names.join(", "))
            })
    }
}
