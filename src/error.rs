//! Error types for the simulation and its configuration.

use std::fmt;

use crate::game::{Cell, PlantKind};

/// Why a plant placement (or selection) was rejected.
///
/// Rejections never mutate the session; the caller decides what feedback
/// to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The run has ended in victory or defeat.
    GameOver,
    /// No plant type is armed.
    NothingSelected,
    /// The cell lies outside the board.
    OutOfBounds(Cell),
    /// The cell already holds a plant.
    Occupied(Cell),
    /// The global re-entrancy lockout has not elapsed yet.
    PlacementLocked {
        /// Milliseconds until placement is allowed again.
        remaining_ms: u32,
    },
    /// The plant type is still cooling down since its last placement.
    CoolingDown {
        /// The plant type.
        kind: PlantKind,
        /// Milliseconds until the type is ready again.
        remaining_ms: u32,
    },
    /// The bank does not hold enough sun.
    InsufficientSun {
        /// Cost of the plant type.
        cost: u32,
        /// Sun currently available.
        available: u32,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver => write!(f, "the run is over"),
            Self::NothingSelected => write!(f, "no plant selected"),
            Self::OutOfBounds(cell) => write!(f, "cell {cell} is outside the lawn"),
            Self::Occupied(cell) => write!(f, "cell {cell} is already planted"),
            Self::PlacementLocked { remaining_ms } => {
                write!(f, "placement locked for another {remaining_ms}ms")
            }
            Self::CoolingDown { kind, remaining_ms } => {
                write!(f, "{} is cooling down ({remaining_ms}ms left)", kind.def().name)
            }
            Self::InsufficientSun { cost, available } => {
                write!(f, "not enough sun: need {cost}, have {available}")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Failure reported by a sun bank listener.
///
/// Listener failures are logged and swallowed by the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    /// Description of the failure.
    pub message: String,
}

impl ListenerError {
    /// Create a new listener error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sun listener failed: {}", self.message)
    }
}

impl std::error::Error for ListenerError {}

/// Problems found while loading or validating level tables and rules.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The level file could not be read.
    Io(String),
    /// The level file is not valid JSON for a level table.
    Parse(String),
    /// The level table contains no levels.
    NoLevels,
    /// A level index was requested that does not exist.
    UnknownLevel {
        /// Requested index (1-based).
        requested: usize,
        /// Number of levels available.
        available: usize,
    },
    /// A wave-based level has no waves.
    NoWaves {
        /// Level id.
        level: u32,
    },
    /// A wave spawns nobody.
    EmptyWave {
        /// Level id.
        level: u32,
        /// Wave index (0-based).
        wave: usize,
    },
    /// A spawn list names no zombie types.
    NoZombieTypes {
        /// Level id.
        level: u32,
    },
    /// A spawn delay range is negative, non-finite or inverted.
    InvalidDelayRange {
        /// Level id.
        level: u32,
        /// Wave index (0-based).
        wave: usize,
        /// Lower bound.
        min_ms: f64,
        /// Upper bound.
        max_ms: f64,
    },
    /// A timed spawner has a non-positive interval or negative timings.
    InvalidSpawner {
        /// Level id.
        level: u32,
        /// What is wrong.
        reason: String,
    },
    /// The zombie speed modifier would stop or reverse zombies.
    InvalidSpeedModifier {
        /// Level id.
        level: u32,
        /// Offending value.
        value: f64,
    },
    /// The board dimensions are zero.
    InvalidBoard {
        /// Rows requested.
        rows: u8,
        /// Columns requested.
        cols: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read level table: {e}"),
            Self::Parse(e) => write!(f, "failed to parse level table: {e}"),
            Self::NoLevels => write!(f, "level table is empty"),
            Self::UnknownLevel {
                requested,
                available,
            } => write!(f, "no level {requested} (table has {available})"),
            Self::NoWaves { level } => write!(f, "level {level} has no waves"),
            Self::EmptyWave { level, wave } => {
                write!(f, "level {level} wave {} spawns no zombies", wave + 1)
            }
            Self::NoZombieTypes { level } => {
                write!(f, "level {level} has a spawn list with no zombie types")
            }
            Self::InvalidDelayRange {
                level,
                wave,
                min_ms,
                max_ms,
            } => write!(
                f,
                "level {level} wave {} has invalid delay range [{min_ms}, {max_ms}]",
                wave + 1
            ),
            Self::InvalidSpawner { level, reason } => {
                write!(f, "level {level} spawner is invalid: {reason}")
            }
            Self::InvalidSpeedModifier { level, value } => {
                write!(f, "level {level} speed modifier {value} must be greater than -1")
            }
            Self::InvalidBoard { rows, cols } => {
                write!(f, "board must have at least one cell, got {rows}x{cols}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a headless run could not produce a result.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// The level or rules were rejected.
    Config(ConfigError),
    /// A structural check failed after a tick.
    Invariant {
        /// Simulation time of the failing tick.
        elapsed_ms: f64,
        /// First violation found.
        message: String,
    },
    /// The tick size cannot advance the simulation.
    InvalidStep(f64),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Invariant {
                elapsed_ms,
                message,
            } => write!(f, "invariant broken at {elapsed_ms}ms: {message}"),
            Self::InvalidStep(step) => write!(f, "tick size must be positive, got {step}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Invariant { .. } | Self::InvalidStep(_) => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
