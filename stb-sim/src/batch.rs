//! Batch simulation with summary statistics and a score histogram.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use stb_core::{Dice, StbConfig};
use stb_engine::DecisionEngine;
use stb_logging::{
    hash_config_bytes, now_ms, write_manifest_atomic, NdjsonWriter, SimManifestV1, RULESET_ID,
    SIM_MANIFEST_VERSION,
};

use crate::turn::{ComputerTurn, EventLog};
use crate::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub mean: f64,
    pub median: u32,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    /// Fraction of turns that shut the box (score 0).
    pub shut_rate: f64,
}

pub struct SimulationReport {
    pub scores: Vec<u32>,
    pub rolls: u64,
    pub summary: ScoreSummary,
    /// Manifest written next to the event log, if events were logged.
    pub manifest_path: Option<PathBuf>,
}

/// Summary statistics; all zero for an empty slice.
pub fn summarize_scores(scores: &[u32]) -> ScoreSummary {
    if scores.is_empty() {
        return ScoreSummary {
            mean: 0.0,
            median: 0,
            std_dev: 0.0,
            min: 0,
            max: 0,
            shut_rate: 0.0,
        };
    }

    let mut min = u32::MAX;
    let mut max = 0u32;
    let mut sum = 0f64;
    let mut sum_sq = 0f64;
    let mut shut = 0usize;
    for &s in scores {
        min = min.min(s);
        max = max.max(s);
        let sf = s as f64;
        sum += sf;
        sum_sq += sf * sf;
        if s == 0 {
            shut += 1;
        }
    }

    let n = scores.len() as f64;
    let mean = sum / n;
    let var = (sum_sq / n) - mean * mean;

    // Upper median via a frequency table over [min..=max].
    let mut freq = vec![0usize; (max - min) as usize + 1];
    for &s in scores {
        freq[(s - min) as usize] += 1;
    }
    let target = scores.len() / 2;
    let mut cum = 0usize;
    let mut median = min;
    for (i, &c) in freq.iter().enumerate() {
        cum += c;
        if cum > target {
            median = min + i as u32;
            break;
        }
    }

    ScoreSummary {
        mean,
        median,
        std_dev: var.max(0.0).sqrt(),
        min,
        max,
        shut_rate: shut as f64 / n,
    }
}

/// Histogram bucket width, in score points.
pub const HIST_BIN: u32 = 5;

/// Render a histogram of scores followed by the summary line.
pub fn format_histogram(scores: &[u32]) -> String {
    if scores.is_empty() {
        return "\nScore histogram: no turns played\n".to_string();
    }
    let s = summarize_scores(scores);
    let min_bucket = (s.min / HIST_BIN) * HIST_BIN;
    let max_bucket = (s.max / HIST_BIN) * HIST_BIN;

    let mut buckets: HashMap<u32, usize> = HashMap::new();
    for &score in scores {
        *buckets.entry((score / HIST_BIN) * HIST_BIN).or_insert(0) += 1;
    }
    let max_count = buckets.values().copied().max().unwrap_or(1);
    let bar_width = 50usize;

    let mut out = String::new();
    out.push_str(&format!(
        "\nScore histogram (N={}, bin={}):\n",
        scores.len(),
        HIST_BIN
    ));
    out.push_str(&"─".repeat(70));
    out.push('\n');

    let mut bucket = min_bucket;
    while bucket <= max_bucket {
        let count = buckets.get(&bucket).copied().unwrap_or(0);
        let bar = "█".repeat((count * bar_width) / max_count.max(1));
        out.push_str(&format!(
            "{:3}-{:3} │{:<50} {:6} ({:.1}%)\n",
            bucket,
            bucket + HIST_BIN - 1,
            bar,
            count,
            (count as f64 / scores.len() as f64) * 100.0
        ));
        bucket += HIST_BIN;
    }
    out.push_str(&"─".repeat(70));
    out.push('\n');
    out.push_str(&format!(
        "\nSummary: mean={:.2}, median={}, std={:.2}, min={}, max={}, shut={:.1}%\n",
        s.mean,
        s.median,
        s.std_dev,
        s.min,
        s.max,
        s.shut_rate * 100.0
    ));
    out
}

pub fn print_histogram(scores: &[u32]) {
    print!("{}", format_histogram(scores));
}

/// Where the run manifest for an event log lives.
pub fn manifest_path_for(events_path: &Path) -> PathBuf {
    events_path.with_extension("run.json")
}

/// Play `cfg.simulation.turns` computer turns with the configured strategy and dice.
///
/// If `cfg.logging.events_path` is set, roll and turn events are appended there and a
/// run manifest is written beside it.
pub fn simulate(
    cfg: &StbConfig,
    engine: &DecisionEngine,
    debug: bool,
) -> Result<SimulationReport, SimError> {
    let sim = &cfg.simulation;
    let dice = Dice::from_kind(cfg.game.num_dice, sim.chance, sim.seed)?;
    let mut turn = ComputerTurn::new(
        engine,
        dice,
        cfg.strategy.flap_strategy,
        cfg.strategy.dice_policy,
    )?
    .with_debug(debug);

    let run_id = format!("sim-{}-{}", sim.seed, now_ms());
    let mut manifest = None;
    if let Some(path) = &cfg.logging.events_path {
        let writer = NdjsonWriter::open_append_with_flush(path, cfg.logging.flush_every)?;
        turn = turn.with_events(EventLog::new(writer, run_id.clone()));

        let m = SimManifestV1 {
            sim_manifest_version: SIM_MANIFEST_VERSION,
            run_id: run_id.clone(),
            created_ts_ms: now_ms(),
            ruleset_id: RULESET_ID.to_string(),
            config_hash: Some(hash_config_bytes(cfg.to_yaml()?.as_bytes())),
            flap_strategy: cfg.strategy.flap_strategy.name().to_string(),
            dice_policy: cfg.strategy.dice_policy.name().to_string(),
            num_flaps: cfg.game.num_flaps,
            num_dice: cfg.game.num_dice,
            seed: sim.seed,
            turns_requested: sim.turns as u64,
            turns_completed: 0,
            mean_score: None,
            shut_rate: None,
        };
        let mpath = manifest_path_for(path);
        write_manifest_atomic(&mpath, &m)?;
        manifest = Some((mpath, m));
    }

    stb_logging::debug_log!(
        "[stb-sim] run={} turns={} strategy={} dice_policy={}",
        run_id,
        sim.turns,
        cfg.strategy.flap_strategy,
        cfg.strategy.dice_policy
    );

    let mut scores = Vec::with_capacity(sim.turns as usize);
    let mut rolls = 0u64;
    for _ in 0..sim.turns {
        let r = turn.perform_turn()?;
        scores.push(r.score);
        rolls += r.rolls as u64;
    }
    turn.finish()?;

    let summary = summarize_scores(&scores);
    let manifest_path = match manifest {
        Some((mpath, mut m)) => {
            m.turns_completed = scores.len() as u64;
            m.mean_score = Some(summary.mean);
            m.shut_rate = Some(summary.shut_rate);
            write_manifest_atomic(&mpath, &m)?;
            Some(mpath)
        }
        None => None,
    };

    Ok(SimulationReport {
        scores,
        rolls,
        summary,
        manifest_path,
    })
}
