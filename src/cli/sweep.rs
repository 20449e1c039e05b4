//! Sweep command implementation.

#![allow(clippy::cast_precision_loss)]

use super::output::{JsonSweepResult, SweepStats, format_sweep_csv, format_sweep_text};
use super::{CliError, SweepFormat, load_level, seed_or_clock};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use verdant::autoplay::StrategyKind;
use verdant::{RunConfig, run_level};

/// Execute the sweep command.
///
/// # Errors
///
/// Returns an error if the level cannot be loaded or output fails.
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub(crate) fn execute(
    level: usize,
    levels: Option<PathBuf>,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    strategy: StrategyKind,
    max_seconds: f64,
    format: SweepFormat,
    progress: bool,
) -> Result<(), CliError> {
    let level = load_level(levels.as_deref(), level)?;
    let level_name = level.name.clone();

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let mut config = RunConfig::new(level);
    config.max_ms = max_seconds * 1000.0;

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    tracing::info!(level = %level_name, %strategy, base_seed, games, "starting sweep");
    let start = Instant::now();

    // Each worker folds into its own stats; the bar is advanced per run
    let stats = (0..games)
        .into_par_iter()
        .fold(SweepStats::new, |mut local, i| {
            let run_seed = base_seed.wrapping_add(i);
            let mut player = strategy.build();
            match run_level(&config, run_seed, player.as_mut()) {
                Ok(result) => local.add_result(&result),
                Err(e) => {
                    tracing::warn!(seed = run_seed, error = %e, "run failed");
                    local.add_error();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SweepStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let runs_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.runs as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SweepFormat::Text => {
            println!();
            print!("{}", format_sweep_text(&stats, &level_name, strategy.as_str()));
            println!();
            println!("Duration: {:.2}s ({:.0} runs/sec)", duration.as_secs_f64(), runs_per_sec);
        }
        SweepFormat::Json => {
            let json_result = JsonSweepResult::from_stats(&stats, &level_name, strategy.as_str(), base_seed);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SweepFormat::Csv => {
            print!("{}", format_sweep_csv(&stats, &level_name, strategy.as_str()));
        }
    }

    Ok(())
}
