//! Run command implementation.

use super::output::format_run_text;
use super::{CliError, OutputFormat, load_level, seed_or_clock};
use std::io::{self, Write};
use std::path::PathBuf;
use verdant::autoplay::StrategyKind;
use verdant::frame::{GameLoop, NullRenderer};
use verdant::game::RunState;
use verdant::view::TextRenderer;
use verdant::{Millis, RunConfig, Session, run_level};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the level cannot be loaded or the run fails.
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub(crate) fn execute(
    level: usize,
    levels: Option<PathBuf>,
    seed: Option<u64>,
    strategy: StrategyKind,
    step: f64,
    max_seconds: f64,
    format: OutputFormat,
    show_every: Option<f64>,
    check: bool,
) -> Result<(), CliError> {
    let level = load_level(levels.as_deref(), level)?;
    let seed = seed_or_clock(seed);

    let mut config = RunConfig::new(level);
    config.step_ms = step;
    config.max_ms = max_seconds * 1000.0;
    config.check_invariants = check;

    tracing::info!(level = %config.level.name, seed, %strategy, "starting run");

    if let Some(every) = show_every {
        if !(every.is_finite() && every > 0.0) {
            return Err(CliError::new(format!("--show-every must be positive, got {every}")));
        }
        print_frames(&config, seed, strategy, every * 1000.0)?;
    }

    let mut player = strategy.build();
    let result = run_level(&config, seed, player.as_mut())?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_run_text(&result));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Replay the run through the frame loop, printing the lawn every
/// `every_ms` of simulation time and once more at the end.
fn print_frames(config: &RunConfig, seed: u64, strategy: StrategyKind, every_ms: Millis) -> Result<(), CliError> {
    if !(config.step_ms.is_finite() && config.step_ms > 0.0) {
        return Err(CliError::new(format!("step must be positive, got {}", config.step_ms)));
    }

    let session = Session::new(config.level.clone(), config.rules, seed)?;
    let mut game = GameLoop::new(session);
    let mut player = strategy.build();
    let mut printer = TextRenderer::new(io::stdout().lock());

    game.start(0.0);
    let mut timestamp = 0.0;
    let mut next_print = 0.0;
    while game.session().state() == RunState::Running && game.session().elapsed_ms() < config.max_ms {
        let now = game.session().elapsed_ms();
        player.act(game.session_mut(), now);
        timestamp += config.step_ms;

        if now >= next_print {
            game.frame(timestamp, &mut printer)?;
            next_print += every_ms;
        } else {
            game.frame(timestamp, &mut NullRenderer)
                .unwrap_or_else(|never| match never {});
        }
    }

    game.frame(timestamp, &mut printer)?;
    printer.into_inner().flush()?;
    Ok(())
}
