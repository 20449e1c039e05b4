//! Verdant CLI - run, watch and sweep lane-defense levels.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use verdant::autoplay::StrategyKind;

/// Verdant - A deterministic lane-defense simulation engine
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one level headlessly with a scripted player
    Run {
        /// Level number, 1-based (default: 1)
        #[arg(short, long, default_value = "1")]
        level: usize,

        /// JSON level table (default: built-in levels)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Scripted player: idle, collector or gardener
        #[arg(long, default_value = "gardener")]
        strategy: StrategyKind,

        /// Simulation milliseconds per tick
        #[arg(long, default_value = "16")]
        step: f64,

        /// Give up after this many simulated seconds
        #[arg(long, default_value = "600")]
        max_seconds: f64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print the lawn every N simulated seconds
        #[arg(long)]
        show_every: Option<f64>,

        /// Check lawn invariants after every tick
        #[arg(long)]
        check: bool,
    },

    /// Interactive TUI: play or watch a level in real time
    Watch {
        /// Level number, 1-based (default: 1)
        #[arg(short, long, default_value = "1")]
        level: usize,

        /// JSON level table (default: built-in levels)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Let a scripted player act
        #[arg(long)]
        autoplay: Option<StrategyKind>,

        /// Game speed multiplier (default: 1.0)
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },

    /// Run many seeds in parallel and aggregate the outcomes
    Sweep {
        /// Level number, 1-based (default: 1)
        #[arg(short, long, default_value = "1")]
        level: usize,

        /// JSON level table (default: built-in levels)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Number of runs (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each run)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Scripted player: idle, collector or gardener
        #[arg(long, default_value = "gardener")]
        strategy: StrategyKind,

        /// Give up each run after this many simulated seconds
        #[arg(long, default_value = "600")]
        max_seconds: f64,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SweepFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// List and validate a level table
    Levels {
        /// JSON level table (default: built-in levels)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            level,
            levels,
            seed,
            strategy,
            step,
            max_seconds,
            format,
            show_every,
            check,
        } => cli::run::execute(level, levels, seed, strategy, step, max_seconds, format, show_every, check),

        Commands::Watch {
            level,
            levels,
            seed,
            autoplay,
            speed,
        } => cli::watch::execute(level, levels, seed, autoplay, speed),

        Commands::Sweep {
            level,
            levels,
            games,
            seed,
            threads,
            strategy,
            max_seconds,
            format,
            progress,
        } => cli::sweep::execute(level, levels, games, seed, threads, strategy, max_seconds, format, progress),

        Commands::Levels { levels, json } => cli::levels::execute(levels, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
