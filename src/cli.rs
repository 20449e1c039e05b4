//! CLI command implementations for Verdant.

pub(crate) mod levels;
pub(crate) mod run;
pub(crate) mod sweep;
pub(crate) mod watch;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;
use verdant::{ConfigError, LevelConfig, LevelSet, RunError};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `sweep` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SweepFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<RunError> for CliError {
    fn from(e: RunError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the level table from `path`, or the built-in one.
pub(crate) fn load_levels(path: Option<&Path>) -> Result<LevelSet, CliError> {
    let levels = match path {
        Some(path) => LevelSet::load(path)?,
        None => LevelSet::builtin(),
    };
    tracing::debug!(count = levels.len(), "level table loaded");
    Ok(levels)
}

/// Pick level `number` (1-based) from the table at `path`.
pub(crate) fn load_level(path: Option<&Path>, number: usize) -> Result<LevelConfig, CliError> {
    Ok(load_levels(path)?.get(number)?.clone())
}

/// Use `seed`, or derive one from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
