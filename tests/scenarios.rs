//! End-to-end scenarios through the public API.
//!
//! Run with: cargo test --release scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use verdant::autoplay::{Gardener, Strategy};
use verdant::frame::{GameLoop, LatestSnapshot, LoopStatus, NullRenderer};
use verdant::game::{ProjectilePool, TickReport, check_invariants};
use verdant::level::{SpawnPlan, TimedSpawnConfig, WaveConfig};
use verdant::{Cell, LevelConfig, LevelSet, ListenerError, PlantKind, Rules, RunState, Session, ZombieKind};

fn level(plan: SpawnPlan) -> LevelConfig {
    LevelConfig {
        id: 99,
        name: "Test".to_string(),
        starting_sun: 500,
        sunlight_bonus: 0,
        zombie_speed_modifier: 0.0,
        plan,
    }
}

/// A level whose only zombie arrives long after any test ends.
fn quiet_level() -> LevelConfig {
    level(SpawnPlan::Timed(TimedSpawnConfig {
        start_delay_ms: 10_000_000.0,
        interval_ms: 1000.0,
        duration_ms: 1000.0,
        types: vec![ZombieKind::Basic],
    }))
}

fn single_basic_level() -> LevelConfig {
    level(SpawnPlan::Waves {
        waves: vec![WaveConfig {
            count: 1,
            delay_range_ms: (0.0, 0.0),
            types: vec![ZombieKind::Basic],
        }],
    })
}

#[test]
fn test_lone_zombie_defeats_once() {
    let mut session = Session::new(single_basic_level(), Rules::default(), 5).unwrap();
    session.start();

    let mut breaches = 0;
    let mut defeat_at = None;
    for tick in 0..10_000 {
        let report = session.advance(16.0);
        if report.breached {
            breaches += 1;
        }
        if session.state() == RunState::Defeat && defeat_at.is_none() {
            defeat_at = Some(tick);
        }
    }

    assert_eq!(breaches, 1);
    assert_eq!(session.state(), RunState::Defeat);
    // 920 px at 0.025 px/ms
    assert!(session.elapsed_ms() >= 36_800.0);
    assert!(session.elapsed_ms() < 37_000.0);
    assert!(defeat_at.is_some());

    // Terminal: nothing moves and nothing can be planted
    assert_eq!(session.advance(16.0), TickReport::default());
    assert!(!session.start());
    assert!(!session.toggle_pause());
    assert!(session.place_plant(PlantKind::Sunflower, Cell::new(0, 0), 1e9).is_err());
}

#[test]
fn test_sunflower_production_accumulates() {
    let mut session = Session::new(quiet_level(), Rules::default(), 1).unwrap();
    session
        .place_plant(PlantKind::Sunflower, Cell::new(2, 0), 0.0)
        .unwrap();
    session.start();

    let mut produced = 0;
    for _ in 0..1499 {
        produced += session.advance(16.0).suns_produced;
    }
    assert_eq!(produced, 0);
    assert_eq!(session.advance(16.0).suns_produced, 1);
    let plant_x = session.lawn().plants[0].x;
    let pickup = session
        .lawn()
        .suns
        .iter()
        .find(|s| s.stationary && (s.x - plant_x).abs() < f64::EPSILON)
        .unwrap();
    assert_eq!(pickup.value, 25);

    // One long jump after a pause yields every full interval
    assert!(session.pause());
    assert_eq!(session.advance(48_000.0).suns_produced, 0);
    assert!(session.resume());
    assert_eq!(session.advance(48_000.0).suns_produced, 2);
}

#[test]
fn test_one_shot_hits_first_created_zombie_only() {
    let rules = Rules::default();
    let mut session = Session::new(quiet_level(), rules, 3).unwrap();
    session
        .place_plant(PlantKind::Peashooter, Cell::new(2, 0), 0.0)
        .unwrap();
    {
        let lawn = session.lawn_mut();
        let first = lawn.spawn_zombie(ZombieKind::Basic, 2, 1.0, &rules);
        let second = lawn.spawn_zombie(ZombieKind::Basic, 2, 1.0, &rules);
        assert!(first.0 < second.0);
        for zombie in &mut lawn.zombies {
            zombie.x = 500.0;
        }
    }
    session.start();

    while session.stats().hits == 0 && session.elapsed_ms() < 5000.0 {
        session.advance(16.0);
    }

    assert_eq!(session.stats().hits, 1);
    assert_eq!(session.stats().shots_fired, 1);
    assert!(session.lawn().projectiles.is_empty());
    assert_eq!(session.lawn().zombies[0].hp, 180);
    assert_eq!(session.lawn().zombies[1].hp, 200);
    assert_eq!(session.lawn().pool.available(), 1);
}

#[test]
fn test_pool_reuse_after_hit_and_miss() {
    let rules = Rules::default();
    let mut session = Session::new(quiet_level(), rules, 3).unwrap();
    session
        .place_plant(PlantKind::Peashooter, Cell::new(0, 0), 0.0)
        .unwrap();
    {
        // The first pea kills it; the second is already in flight and misses
        let lawn = session.lawn_mut();
        lawn.spawn_zombie(ZombieKind::Basic, 0, 1.0, &rules);
        lawn.zombies[0].hp = 1;
    }
    session.start();

    for _ in 0..1000 {
        session.advance(16.0);
        if session.stats().hits == 1 && session.lawn().projectiles.is_empty() {
            break;
        }
    }
    assert_eq!(session.stats().shots_fired, 2);
    assert_eq!(session.stats().hits, 1);
    assert!(session.lawn().projectiles.is_empty());
    let pool: &ProjectilePool = &session.lawn().pool;
    assert_eq!(pool.created(), 2);
    assert_eq!(pool.available(), 2);

    // The next shot reuses a pooled pea
    session
        .lawn_mut()
        .spawn_zombie(ZombieKind::Basic, 0, 1.0, &rules);
    session.advance(16.0);
    assert_eq!(session.stats().shots_fired, 3);
    assert_eq!(session.lawn().pool.created(), 2);
    assert_eq!(session.lawn().pool.available(), 1);
}

#[test]
fn test_reset_restores_initial_state() {
    let level = LevelSet::builtin().get(2).unwrap().clone();
    let funds = level.starting_funds();
    let mut session = Session::new(level, Rules::default(), 11).unwrap();
    let mut player = Gardener::default();
    session.start();
    for _ in 0..3000 {
        let now = session.elapsed_ms();
        player.act(&mut session, now);
        session.advance(16.0);
    }
    assert!(session.stats().plants_placed > 0);
    assert!(session.stats().zombies_spawned > 0);

    session.reset();

    assert_eq!(session.state(), RunState::Ready);
    assert_eq!(session.sun(), funds);
    assert_eq!(session.sun(), 150);
    assert_eq!(session.progress().wave_index(), 0);
    assert_eq!(session.progress().spawned_in_wave(), 0);
    assert!(session.lawn().plants.is_empty());
    assert!(session.lawn().zombies.is_empty());
    assert!(session.lawn().projectiles.is_empty());
    assert!(session.lawn().suns.is_empty());
    assert_eq!(session.lawn().board.occupied(), 0);
    assert!(session.elapsed_ms().abs() < f64::EPSILON);
    assert_eq!(*session.stats(), verdant::game::RunStats::default());
    assert!(check_invariants(session.lawn()).is_empty());
}

#[test]
fn test_failing_listener_does_not_block_others() {
    let mut session = Session::new(quiet_level(), Rules::default(), 1).unwrap();
    let seen = Arc::new(AtomicU32::new(0));
    let calls = Arc::new(AtomicU32::new(0));

    session
        .bank_mut()
        .subscribe(Box::new(|_| Err(ListenerError::new("display gone"))));
    let seen_by_listener = Arc::clone(&seen);
    let calls_by_listener = Arc::clone(&calls);
    session.bank_mut().subscribe(Box::new(move |value| {
        seen_by_listener.store(value, Ordering::SeqCst);
        calls_by_listener.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));
    assert_eq!(seen.load(Ordering::SeqCst), 500);

    session
        .place_plant(PlantKind::Peashooter, Cell::new(0, 0), 0.0)
        .unwrap();
    assert_eq!(session.sun(), 400);
    assert_eq!(seen.load(Ordering::SeqCst), 400);

    // Rejected spend: no change, no notification
    let before = calls.load(Ordering::SeqCst);
    assert!(!session.bank_mut().spend(10_000));
    assert_eq!(session.sun(), 400);
    assert_eq!(calls.load(Ordering::SeqCst), before);
}

#[test]
fn test_frame_loop_pause_does_not_jump() {
    let session = Session::new(quiet_level(), Rules::default(), 1).unwrap();
    let mut game = GameLoop::new(session);
    let mut latest = LatestSnapshot::default();

    // Ready: frames only render
    let report = game.frame(0.0, &mut latest).unwrap();
    assert_eq!(report.status, LoopStatus::Idle);
    assert!(latest.snapshot.is_some());

    assert!(game.start(0.0));
    game.frame(16.0, &mut latest).unwrap();
    game.frame(32.0, &mut latest).unwrap();
    assert!((game.session().elapsed_ms() - 32.0).abs() < 1e-9);

    assert!(game.toggle_pause(32.0));
    let report = game.frame(10_000.0, &mut latest).unwrap();
    assert_eq!(report.status, LoopStatus::Idle);
    assert_eq!(latest.snapshot.as_ref().unwrap().state, RunState::Paused);

    assert!(game.toggle_pause(20_000.0));
    let report = game.frame(20_016.0, &mut latest).unwrap();
    assert_eq!(report.status, LoopStatus::Advanced);
    assert!((game.session().elapsed_ms() - 48.0).abs() < 1e-9);

    // A long stall is clamped
    game.frame(60_000.0, &mut latest).unwrap();
    let clamped = 48.0 + game.session().rules().max_frame_delta_ms;
    assert!((game.session().elapsed_ms() - clamped).abs() < 1e-9);

    game.stop();
    let report = game.frame(60_016.0, &mut NullRenderer).unwrap();
    assert_eq!(report.status, LoopStatus::Stopped);

    game.restart();
    assert!(!game.is_stopped());
    assert_eq!(game.session().state(), RunState::Ready);
}

#[test]
fn test_builtin_levels_finish_with_gardener() {
    for number in 1..=LevelSet::builtin().len() {
        let config = verdant::RunConfig::new(LevelSet::builtin().get(number).unwrap().clone());
        let result = verdant::run_level(&config, 2024, &mut Gardener::default()).unwrap();
        assert_ne!(result.outcome, verdant::Outcome::Timeout, "level {number} timed out");
        assert!(result.stats.zombies_spawned > 0);
    }
}
