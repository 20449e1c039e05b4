//! Structural sanity checks on a lawn.
//!
//! These hold between ticks in a correct simulation. They are bug
//! detectors for tests, fuzzing and debug builds, not gameplay rules.

use std::collections::HashSet;

use crate::game::Lawn;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all lawn invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(lawn: &Lawn) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Board cells point at live plants standing in that cell
    for (cell, occupant) in lawn.board.iter() {
        let Some(id) = occupant else { continue };
        match lawn.plant(id) {
            None => violations.push(violation(format!("cell {cell} names missing plant {}", id.0))),
            Some(plant) if plant.cell != cell => violations.push(violation(format!(
                "cell {cell} names plant {} which stands in {}",
                id.0, plant.cell
            ))),
            Some(plant) if !plant.is_alive() => {
                violations.push(violation(format!("cell {cell} holds dead plant {}", id.0)));
            }
            Some(_) => {}
        }
    }

    // Every plant is registered in its own cell, once
    let mut plant_ids = HashSet::new();
    for plant in &lawn.plants {
        if !plant_ids.insert(plant.id) {
            violations.push(violation(format!("plant id {} used twice", plant.id.0)));
        }
        if lawn.board.get(plant.cell) != Some(plant.id) {
            violations.push(violation(format!(
                "plant {} is not registered in {}",
                plant.id.0, plant.cell
            )));
        }
    }

    let mut zombie_ids = HashSet::new();
    for zombie in &lawn.zombies {
        if !zombie_ids.insert(zombie.id) {
            violations.push(violation(format!("zombie id {} used twice", zombie.id.0)));
        }
        if zombie.lane >= lawn.board.rows() {
            violations.push(violation(format!(
                "zombie {} walks lane {} of {}",
                zombie.id.0,
                zombie.lane,
                lawn.board.rows()
            )));
        }
        if let Some(target) = zombie.target
            && !lawn.plant(target).is_some_and(|p| p.is_alive())
        {
            violations.push(violation(format!(
                "zombie {} targets missing plant {}",
                zombie.id.0, target.0
            )));
        }
        if zombie.eating && zombie.target.is_none() {
            violations.push(violation(format!("zombie {} eats nothing", zombie.id.0)));
        }
        if !zombie.x.is_finite() {
            violations.push(violation(format!("zombie {} has x {}", zombie.id.0, zombie.x)));
        }
    }

    // The pool accounts for every projectile it created
    let accounted = lawn.projectiles.len() + lawn.pool.available();
    if accounted != lawn.pool.created() {
        violations.push(violation(format!(
            "pool created {} projectiles but {accounted} are accounted for",
            lawn.pool.created()
        )));
    }

    for sun in &lawn.suns {
        if sun.life_ms <= 0.0 {
            violations.push(violation(format!("expired pickup at ({}, {})", sun.x, sun.y)));
        }
    }

    violations
}

/// Assert all lawn invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(lawn: &Lawn) {
    let violations = check_invariants(lawn);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Lawn invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_lawn: &Lawn) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Cell, PlantId, PlantKind, Rules, ZombieKind};

    fn valid_lawn() -> (Lawn, Rules) {
        let rules = Rules::default();
        let mut lawn = Lawn::new(Board::new(rules.rows, rules.cols).unwrap());
        let id = lawn
            .insert_plant(PlantKind::WallNut, Cell::new(1, 4), &rules)
            .unwrap();
        lawn.spawn_zombie(ZombieKind::Basic, 1, 1.0, &rules);
        lawn.zombies[0].start_eating(id);
        let p = lawn.pool.acquire();
        lawn.projectiles.push(p);
        (lawn, rules)
    }

    #[test]
    fn test_valid_lawn_passes() {
        let (lawn, _) = valid_lawn();
        assert!(check_invariants(&lawn).is_empty());
    }

    #[test]
    fn test_stale_cell_detected() {
        let (mut lawn, _) = valid_lawn();
        lawn.board.occupy(Cell::new(0, 0), PlantId(77));

        let violations = check_invariants(&lawn);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("missing plant"));
    }

    #[test]
    fn test_dangling_target_detected() {
        let (mut lawn, _) = valid_lawn();
        lawn.zombies[0].target = Some(PlantId(42));

        let violations = check_invariants(&lawn);
        assert!(violations.iter().any(|v| v.message.contains("targets")));
    }

    #[test]
    fn test_leaked_projectile_detected() {
        let (mut lawn, _) = valid_lawn();
        lawn.projectiles.clear();

        let violations = check_invariants(&lawn);
        assert!(violations.iter().any(|v| v.message.contains("pool")));
    }

    #[test]
    fn test_unregistered_plant_detected() {
        let (mut lawn, _) = valid_lawn();
        lawn.board.vacate(Cell::new(1, 4));

        let violations = check_invariants(&lawn);
        assert!(violations.iter().any(|v| v.message.contains("not registered")));
    }
}
