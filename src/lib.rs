// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Verdant: a deterministic lane-defense simulation engine.
//!
//! Plants are placed on a grid of lanes to collect sun and stop zombies
//! walking towards the house. The crate provides:
//! - A tick-based simulation with explicit, seedable state
//! - Level tables with wave and timed spawn plans
//! - A frame loop that turns display timestamps into simulation time
//! - Scripted players and a parallel batch runner for balance work
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Runner / Frame loop / Renderers   │
//! ├─────────────────────────────────────┤
//! │   Session (input, waves, run state) │
//! ├─────────────────────────────────────┤
//! │   Lawn + combat phases + economy    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use verdant::{Cell, LevelSet, PlantKind, Rules, Session};
//!
//! let level = LevelSet::builtin().get(1)?.clone();
//! let mut session = Session::new(level, Rules::default(), 42)?;
//! session.place_plant(PlantKind::Sunflower, Cell::new(0, 0), 0.0).ok();
//! session.start();
//! for _ in 0..100 {
//!     session.advance(16.0);
//! }
//! assert_eq!(session.sun(), 100);
//! # Ok::<(), verdant::ConfigError>(())
//! ```

pub mod autoplay;
pub mod error;
pub mod frame;
pub mod game;
pub mod level;
pub mod runner;
pub mod view;

pub use error::{ConfigError, ListenerError, PlacementError, RunError};

// Re-export key types at crate root for convenience
pub use game::{Cell, Millis, PlantKind, Rules, RunState, Session, Snapshot, ZombieKind};
pub use level::{LevelConfig, LevelSet};
pub use runner::{Outcome, RunConfig, RunResult, run_level};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let level = LevelSet::builtin().get(3).unwrap().clone();
        let session = Session::new(level, Rules::default(), 0).unwrap();
        assert_eq!(session.state(), RunState::Ready);
        assert_eq!(session.level().name, "Dusk");
    }
}
