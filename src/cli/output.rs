//! Output formatting utilities for CLI.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use verdant::game::RunStats;
use verdant::{Outcome, RunResult};

/// Format a run result as human-readable text.
pub(super) fn format_run_text(result: &RunResult) -> String {
    let mut output = String::new();
    let stats = &result.stats;

    output.push_str(&format!(
        "Run Result ({} \"{}\", seed: {})\n",
        result.level_id, result.level_name, result.seed
    ));
    output.push_str(&format!("  Strategy: {}\n", result.strategy));
    output.push_str(&format!("  Outcome: {}\n", result.outcome));
    output.push_str(&format!(
        "  Time: {:.1}s ({} ticks), wave {}\n\n",
        result.elapsed_ms / 1000.0,
        result.ticks,
        result.wave_reached
    ));
    output.push_str(&format!(
        "  Zombies: {} spawned, {} killed\n",
        stats.zombies_spawned, stats.zombies_killed
    ));
    output.push_str(&format!(
        "  Plants: {} placed, {} lost\n",
        stats.plants_placed, stats.plants_lost
    ));
    output.push_str(&format!("  Shots: {} fired, {} hit\n", stats.shots_fired, stats.hits));
    output.push_str(&format!(
        "  Sun: {} collected, {} spent, {} expired, {} left\n",
        stats.sun_collected, stats.sun_spent, stats.suns_expired, result.final_sun
    ));

    output
}

/// Aggregated outcomes over many seeds.
#[derive(Debug, Default, Clone)]
pub(super) struct SweepStats {
    /// Runs finished.
    pub(super) runs: u64,
    /// Runs won.
    pub(super) victories: u64,
    /// Runs lost.
    pub(super) defeats: u64,
    /// Runs that hit the time limit.
    pub(super) timeouts: u64,
    /// Runs that failed to execute.
    pub(super) errors: u64,
    total_elapsed_ms: f64,
    total_kills: u64,
    total_plants: u64,
    total_sun_collected: u64,
    /// Seeds of lost runs, for reproduction.
    pub(super) defeat_seeds: Vec<u64>,
}

impl SweepStats {
    /// Empty totals.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Fold one run into the totals.
    pub(super) fn add_result(&mut self, result: &RunResult) {
        self.runs += 1;
        match result.outcome {
            Outcome::Victory => self.victories += 1,
            Outcome::Defeat => {
                self.defeats += 1;
                self.defeat_seeds.push(result.seed);
            }
            Outcome::Timeout => self.timeouts += 1,
        }
        self.total_elapsed_ms += result.elapsed_ms;
        self.add_stats(&result.stats);
    }

    fn add_stats(&mut self, stats: &RunStats) {
        self.total_kills += u64::from(stats.zombies_killed);
        self.total_plants += u64::from(stats.plants_placed);
        self.total_sun_collected += u64::from(stats.sun_collected);
    }

    /// Record a run that failed before finishing.
    pub(super) fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Combine totals from another worker.
    pub(super) fn merge(&mut self, other: &Self) {
        self.runs += other.runs;
        self.victories += other.victories;
        self.defeats += other.defeats;
        self.timeouts += other.timeouts;
        self.errors += other.errors;
        self.total_elapsed_ms += other.total_elapsed_ms;
        self.total_kills += other.total_kills;
        self.total_plants += other.total_plants;
        self.total_sun_collected += other.total_sun_collected;
        self.defeat_seeds.extend_from_slice(&other.defeat_seeds);
    }

    fn per_run(&self, total: f64) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        total / self.runs as f64
    }

    /// Share of runs won (0.0-1.0).
    pub(super) fn win_rate(&self) -> f64 {
        self.per_run(self.victories as f64)
    }

    /// Average simulated seconds per run.
    pub(super) fn avg_seconds(&self) -> f64 {
        self.per_run(self.total_elapsed_ms) / 1000.0
    }

    /// Average kills per run.
    pub(super) fn avg_kills(&self) -> f64 {
        self.per_run(self.total_kills as f64)
    }

    /// Average plants placed per run.
    pub(super) fn avg_plants(&self) -> f64 {
        self.per_run(self.total_plants as f64)
    }

    /// Average sun collected per run.
    pub(super) fn avg_sun(&self) -> f64 {
        self.per_run(self.total_sun_collected as f64)
    }
}

/// JSON-serializable sweep result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSweepResult {
    level: String,
    strategy: String,
    base_seed: u64,
    runs: u64,
    victories: u64,
    defeats: u64,
    timeouts: u64,
    errors: u64,
    win_rate: f64,
    avg_seconds: f64,
    avg_kills: f64,
    avg_plants: f64,
    avg_sun: f64,
    defeat_seeds: Vec<u64>,
}

impl JsonSweepResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &SweepStats, level: &str, strategy: &str, base_seed: u64) -> Self {
        let mut defeat_seeds = stats.defeat_seeds.clone();
        defeat_seeds.sort_unstable();
        Self {
            level: level.to_string(),
            strategy: strategy.to_string(),
            base_seed,
            runs: stats.runs,
            victories: stats.victories,
            defeats: stats.defeats,
            timeouts: stats.timeouts,
            errors: stats.errors,
            win_rate: stats.win_rate(),
            avg_seconds: stats.avg_seconds(),
            avg_kills: stats.avg_kills(),
            avg_plants: stats.avg_plants(),
            avg_sun: stats.avg_sun(),
            defeat_seeds,
        }
    }
}

/// Format sweep stats as human-readable text.
pub(super) fn format_sweep_text(stats: &SweepStats, level: &str, strategy: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Sweep Results ({level}, {strategy}, {} runs)\n", stats.runs));
    output.push_str(&"=".repeat(50));
    output.push('\n');
    output.push_str(&format!(
        "  Victory: {:>6} ({:>5.1}%)\n",
        stats.victories,
        stats.win_rate() * 100.0
    ));
    output.push_str(&format!("  Defeat:  {:>6}\n", stats.defeats));
    output.push_str(&format!("  Timeout: {:>6}\n", stats.timeouts));
    if stats.errors > 0 {
        output.push_str(&format!("  Errors:  {:>6}\n", stats.errors));
    }
    output.push('\n');
    output.push_str(&format!("  Avg length:  {:.1}s\n", stats.avg_seconds()));
    output.push_str(&format!("  Avg kills:   {:.1}\n", stats.avg_kills()));
    output.push_str(&format!("  Avg plants:  {:.1}\n", stats.avg_plants()));
    output.push_str(&format!("  Avg sun:     {:.0}\n", stats.avg_sun()));

    if !stats.defeat_seeds.is_empty() {
        let mut seeds = stats.defeat_seeds.clone();
        seeds.sort_unstable();
        let shown: Vec<String> = seeds.iter().take(10).map(u64::to_string).collect();
        output.push_str(&format!("\n  Lost seeds: {}", shown.join(", ")));
        if seeds.len() > shown.len() {
            output.push_str(&format!(" (+{} more)", seeds.len() - shown.len()));
        }
        output.push('\n');
    }

    output
}

/// Format sweep stats as CSV.
pub(super) fn format_sweep_csv(stats: &SweepStats, level: &str, strategy: &str) -> String {
    let mut output = String::new();
    output.push_str("level,strategy,runs,victories,defeats,timeouts,errors,win_rate,avg_seconds,avg_kills,avg_plants,avg_sun\n");
    output.push_str(&format!(
        "{},{},{},{},{},{},{},{:.4},{:.2},{:.2},{:.2},{:.1}\n",
        level,
        strategy,
        stats.runs,
        stats.victories,
        stats.defeats,
        stats.timeouts,
        stats.errors,
        stats.win_rate(),
        stats.avg_seconds(),
        stats.avg_kills(),
        stats.avg_plants(),
        stats.avg_sun()
    ));
    output
}
