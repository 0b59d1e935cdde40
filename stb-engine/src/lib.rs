//! Decision engine for Shut the Box.
//!
//! Per roll, an automated player asks two questions:
//! - how many dice to roll ([`DecisionEngine::dice_to_roll`], driven by a
//!   [`stb_core::DicePolicy`]), and
//! - which open flaps to close for the rolled total ([`DecisionEngine::choose_flaps`],
//!   driven by a [`stb_core::FlapStrategy`]).
//!
//! Layers, leaf to root:
//! - [`combos`]: exact-sum subset search with prefer-highest / prefer-lowest tie-breaks
//! - [`distribution`]: exhaustive dice-total distribution for n dice
//! - [`table`]: optional optimal-strategy lookup table
//! - [`engine`]: success probabilities and the closing strategies

pub mod combos;
pub mod distribution;
pub mod engine;
pub mod table;

pub use combos::{
    all_combinations, find_combination, has_combination, reachable, subset_sums, Combinations,
    TieBreak,
};
pub use distribution::{dice_sum_distribution, DiceDistribution};
pub use engine::{
    DecisionEngine, DecisionError, EngineError, EngineSettings, ScoredCandidate, TIE_EPSILON,
};
pub use table::{
    OptimalTable, TableError, TABLE_HEADER_LINES, TABLE_MAX_TOTAL, TABLE_NUM_FLAPS, TABLE_ROWS,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod combos_tests;
#[cfg(test)]
mod test_support;
