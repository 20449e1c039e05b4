#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use verdant::game::{
    Board, Cell, Lawn, PlantKind, Rules, TickReport, ZombieKind, advance_projectiles, advance_suns,
    check_invariants, remove_casualties, resolve_hits, update_plants, update_zombies,
};

/// A plant to place before the fight.
#[derive(Arbitrary, Debug)]
struct PlantSpec {
    kind: u8,
    row: u8,
    col: u8,
}

/// A zombie to spawn before the fight.
#[derive(Arbitrary, Debug)]
struct ZombieSpec {
    kind: u8,
    lane: u8,
    /// Start x, as a fraction of the lawn width in 1/255 steps.
    x: u8,
    /// Speed multiplier in 1/100 steps.
    speed: u8,
}

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    plants: Vec<PlantSpec>,
    zombies: Vec<ZombieSpec>,
    /// Tick lengths in milliseconds.
    deltas: Vec<u16>,
}

fuzz_target!(|input: CombatInput| {
    let rules = Rules::default();
    let Some(board) = Board::new(rules.rows, rules.cols) else {
        return;
    };
    let mut lawn = Lawn::new(board);

    for spec in input.plants.iter().take(64) {
        let kind = PlantKind::ALL[usize::from(spec.kind) % PlantKind::COUNT];
        let cell = Cell::new(spec.row % rules.rows, spec.col % rules.cols);
        lawn.insert_plant(kind, cell, &rules);
    }
    for spec in input.zombies.iter().take(64) {
        let kind = ZombieKind::ALL[usize::from(spec.kind) % ZombieKind::ALL.len()];
        let multiplier = f64::from(spec.speed) / 100.0 + 0.01;
        let id = lawn.spawn_zombie(kind, spec.lane % rules.rows, multiplier, &rules);
        if let Some(zombie) = lawn.zombies.iter_mut().find(|z| z.id == id) {
            zombie.x = rules.board_width() * f64::from(spec.x) / 255.0 + 1.0;
        }
    }

    let mut now = 0.0;
    for &delta in input.deltas.iter().take(2000) {
        let delta = f64::from(delta % 200);
        now += delta;
        let mut report = TickReport::default();

        advance_projectiles(&mut lawn, &rules, delta);
        update_plants(&mut lawn, &rules, delta, &mut report);
        update_zombies(&mut lawn, &rules, now, delta, &mut report);
        resolve_hits(&mut lawn, &rules, now, &mut report);
        remove_casualties(&mut lawn, &mut report);
        advance_suns(&mut lawn, &rules, delta, &mut report);

        let violations = check_invariants(&lawn);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");

        if report.breached {
            break;
        }
    }
});
