//! Benchmarks for the simulation hot paths.
//!
//! Covers single ticks on a busy lawn, full headless runs and snapshots.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use verdant::autoplay::{Gardener, Strategy};
use verdant::{Cell, LevelSet, PlantKind, RunConfig, Rules, Session, ZombieKind, run_level};

/// A running session with a full lawn and a crowd of zombies.
fn busy_session() -> Session {
    let level = LevelSet::builtin().get(2).unwrap_or_else(|e| panic!("{e}")).clone();
    let rules = Rules::default();
    let mut session = Session::new(level, rules, 42).unwrap_or_else(|e| panic!("{e}"));
    session.bank_mut().add(100_000.0);

    let kinds = [PlantKind::Sunflower, PlantKind::Peashooter, PlantKind::SnowPea, PlantKind::WallNut];
    let mut now = 0.0;
    for row in 0..rules.rows {
        for col in 0..4 {
            // Step past the lockout and every cooldown between placements
            now += 20_000.0;
            let _ = session.place_plant(kinds[usize::from(col)], Cell::new(row, col), now);
        }
    }

    let lawn = session.lawn_mut();
    for i in 0..40u8 {
        let id = lawn.spawn_zombie(ZombieKind::Cone, i % rules.rows, 1.0, &rules);
        if let Some(zombie) = lawn.zombies.iter_mut().find(|z| z.id == id) {
            zombie.x = 500.0 + f64::from(i) * 10.0;
        }
    }
    session.start();
    session
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("tick_busy_lawn", |b| {
        b.iter_batched(
            busy_session,
            |mut session| {
                for _ in 0..60 {
                    black_box(session.advance(black_box(16.0)));
                }
                session
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_full_run(c: &mut Criterion) {
    let config = RunConfig::new(LevelSet::builtin().get(1).unwrap_or_else(|e| panic!("{e}")).clone());

    c.bench_function("run_level_day1_gardener", |b| {
        b.iter(|| {
            let mut player = Gardener::default();
            let result = run_level(black_box(&config), black_box(42), &mut player);
            black_box(result)
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut session = busy_session();
    let mut player = Gardener::default();
    for _ in 0..200 {
        let now = session.elapsed_ms();
        player.act(&mut session, now);
        session.advance(16.0);
    }

    c.bench_function("snapshot_busy_lawn", |b| {
        b.iter(|| black_box(session.snapshot(black_box(session.elapsed_ms()))));
    });
}

criterion_group!(benches, bench_tick, bench_full_run, bench_snapshot);
criterion_main!(benches);
