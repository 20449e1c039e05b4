//! Tunable simulation constants.

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Millis};

/// Sun granted per point of a level's sunlight bonus.
pub const SUNLIGHT_BONUS_UNIT: u32 = 25;

/// Every number the simulation is balanced around.
///
/// `Rules::default()` reproduces the classic 5x9 lawn. Distances are in
/// pixels, speeds in pixels per millisecond, durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Number of lanes.
    pub rows: u8,
    /// Number of columns per lane.
    pub cols: u8,
    /// Edge length of a square cell.
    pub cell_size: f64,
    /// Largest delta a single frame may feed into the simulation.
    pub max_frame_delta_ms: Millis,
    /// Value of a pickup falling from the sky.
    pub sky_sun_value: u32,
    /// Mean time between sky drops.
    pub sky_sun_interval_ms: Millis,
    /// Uniform jitter applied to each sky drop interval.
    pub sky_sun_jitter_ms: Millis,
    /// How long a pickup stays on the lawn.
    pub sun_lifetime_ms: Millis,
    /// Fall speed of sky pickups.
    pub sun_fall_speed: f64,
    /// Pointer distance within which a pickup is collected.
    pub sun_pickup_radius: f64,
    /// Global lockout after any successful placement.
    pub placement_lockout_ms: Millis,
    /// Projectile speed.
    pub projectile_speed: f64,
    /// Projectile edge length.
    pub projectile_size: f64,
    /// Distance past the right edge at which projectiles are culled.
    pub projectile_cull_margin: f64,
    /// Pause between a cleared wave and the next wave's first spawn.
    pub wave_grace_ms: Millis,
    /// Zombie hit box width.
    pub zombie_width: f64,
    /// Zombie hit box height.
    pub zombie_height: f64,
    /// How far past the right edge zombies appear.
    pub zombie_spawn_offset: f64,
    /// Speed factor applied to slowed zombies.
    pub slow_factor: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 9,
            cell_size: 100.0,
            max_frame_delta_ms: 50.0,
            sky_sun_value: 25,
            sky_sun_interval_ms: 9000.0,
            sky_sun_jitter_ms: 1500.0,
            sun_lifetime_ms: 8000.0,
            sun_fall_speed: 0.05,
            sun_pickup_radius: 30.0,
            placement_lockout_ms: 300.0,
            projectile_speed: 0.45,
            projectile_size: 12.0,
            projectile_cull_margin: 40.0,
            wave_grace_ms: 4000.0,
            zombie_width: 80.0,
            zombie_height: 90.0,
            zombie_spawn_offset: 20.0,
            slow_factor: 0.5,
        }
    }
}

impl Rules {
    /// Width of the lawn in pixels.
    #[must_use]
    pub fn board_width(&self) -> f64 {
        f64::from(self.cols) * self.cell_size
    }

    /// Height of the lawn in pixels.
    #[must_use]
    pub fn board_height(&self) -> f64 {
        f64::from(self.rows) * self.cell_size
    }

    /// Pixel centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> (f64, f64) {
        let half = self.cell_size / 2.0;
        (
            f64::from(cell.col) * self.cell_size + half,
            f64::from(cell.row) * self.cell_size + half,
        )
    }

    /// Vertical centre of a lane.
    #[must_use]
    pub fn lane_center(&self, lane: u8) -> f64 {
        f64::from(lane) * self.cell_size + self.cell_size / 2.0
    }

    /// Cell under a pixel position, if it lies on the lawn.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<Cell> {
        if !(0.0..self.board_width()).contains(&x) || !(0.0..self.board_height()).contains(&y) {
            return None;
        }
        let col = (x / self.cell_size).floor() as u8;
        let row = (y / self.cell_size).floor() as u8;
        Some(Cell::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let rules = Rules::default();
        assert!((rules.board_width() - 900.0).abs() < f64::EPSILON);
        assert!((rules.board_height() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cell_center() {
        let rules = Rules::default();
        let (x, y) = rules.cell_center(Cell::new(2, 3));
        assert!((x - 350.0).abs() < f64::EPSILON);
        assert!((y - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cell_at() {
        let rules = Rules::default();
        assert_eq!(rules.cell_at(350.0, 250.0), Some(Cell::new(2, 3)));
        assert_eq!(rules.cell_at(0.0, 0.0), Some(Cell::new(0, 0)));
        assert_eq!(rules.cell_at(900.0, 10.0), None);
        assert_eq!(rules.cell_at(-1.0, 10.0), None);
    }

    #[test]
    fn test_rules_from_partial_json() {
        let rules: Rules = serde_json::from_str(r#"{"rows": 6}"#).unwrap();
        assert_eq!(rules.rows, 6);
        assert_eq!(rules.cols, 9);
    }
}
