#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use verdant::game::{Cell, PlantKind, Rules, RunState, Session, check_invariants};
use verdant::level::LevelSet;

/// One input event between ticks.
#[derive(Arbitrary, Debug)]
enum Event {
    Select(u8),
    Place { row: u8, col: u8 },
    Collect { x: u16, y: u16 },
    Tick(u8),
    TogglePause,
    Reset,
}

/// Structured input for whole-session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    level: u8,
    seed: u64,
    events: Vec<Event>,
}

fuzz_target!(|input: SessionInput| {
    let levels = LevelSet::builtin();
    let number = usize::from(input.level) % levels.len() + 1;
    let Ok(level) = levels.get(number) else {
        return;
    };
    let Ok(mut session) = Session::new(level.clone(), Rules::default(), input.seed) else {
        return;
    };
    session.start();

    let mut now = 0.0;
    for event in input.events.into_iter().take(5000) {
        let placed_before = session.lawn().board.occupied();
        let sun_before = session.sun();
        match event {
            Event::Select(kind) => {
                let kind = PlantKind::ALL[usize::from(kind) % PlantKind::COUNT];
                let _ = session.select_plant(kind, now);
            }
            Event::Place { row, col } => {
                // Out-of-range cells are part of the input space
                let result = session.place_selected(Cell::new(row % 8, col % 12), now);
                let placed = session.lawn().board.occupied();
                match result {
                    Ok(_) => assert_eq!(placed, placed_before + 1),
                    Err(_) => {
                        assert_eq!(placed, placed_before);
                        assert_eq!(session.sun(), sun_before);
                    }
                }
            }
            Event::Collect { x, y } => {
                let _ = session.collect_sun_at(f64::from(x % 1000), f64::from(y % 600));
            }
            Event::Tick(ms) => {
                now += f64::from(ms);
                session.advance(f64::from(ms));
            }
            Event::TogglePause => {
                session.toggle_pause();
            }
            Event::Reset => {
                session.reset();
                session.start();
            }
        }

        let violations = check_invariants(session.lawn());
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
        if session.state() == RunState::Defeat {
            assert!(session.advance(16.0).spawned == 0);
        }
    }
});
