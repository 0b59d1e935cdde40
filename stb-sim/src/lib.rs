//! stb-sim: computer turns, batch simulation and strategy comparison.

pub mod batch;
pub mod compare;
pub mod turn;

pub use batch::{
    format_histogram, manifest_path_for, print_histogram, simulate, summarize_scores,
    ScoreSummary, SimulationReport, HIST_BIN,
};
pub use compare::{strategy_differences, StrategyDifference};
pub use turn::{ComputerTurn, EventLog, RollOutcome, TurnResult};

use stb_core::{ConfigError, DiceError, FlapError};
use stb_engine::{DecisionError, EngineError};
use stb_logging::NdjsonError;
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Flap(#[from] FlapError),
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Log(#[from] NdjsonError),
    #[error("engine/dice mismatch: {0}")]
    Mismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod sim_tests;
