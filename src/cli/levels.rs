//! Levels command implementation.

use super::{CliError, load_levels};
use std::path::PathBuf;
use verdant::level::{LevelConfig, SpawnPlan};

/// Execute the levels command.
///
/// # Errors
///
/// Returns an error if the table cannot be read or fails validation.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(levels: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let table = load_levels(levels.as_deref())?;
    table.validate()?;

    if json {
        println!("{}", table.to_json()?);
        return Ok(());
    }

    for (number, level) in table.iter().enumerate() {
        println!("{:>2}. {}", number + 1, describe(level));
    }
    println!();
    println!("{} level(s) OK", table.len());
    Ok(())
}

fn describe(level: &LevelConfig) -> String {
    let plan = match &level.plan {
        SpawnPlan::Waves { waves } => format!("{} waves", waves.len()),
        SpawnPlan::Timed(timed) => format!(
            "timed every {:.1}s for {:.0}s",
            timed.interval_ms / 1000.0,
            timed.duration_ms / 1000.0
        ),
    };
    let mut line = format!(
        "{} (id {}): {} sun, {}, {} zombies",
        level.name,
        level.id,
        level.starting_funds(),
        plan,
        level.plan.zombie_count()
    );
    if level.zombie_speed_modifier != 0.0 {
        line.push_str(&format!(", zombies {:+.0}% speed", level.zombie_speed_modifier * 100.0));
    }
    line
}
