//! Policy tags shared by the decision engine, simulations and configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Max sum of open flaps for which a single die may be rolled.
pub const DEFAULT_SINGLE_DIE_MAX_SUM: u32 = 6;

/// Preference for how many dice to roll when a single die is allowed.
///
/// The policy only expresses preference; whether a single die is allowed at all is
/// decided by the caller from the open-flap sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DicePolicy {
    /// Always roll one die when allowed.
    #[default]
    OneIfPossible,
    /// Always roll every die.
    AlwaysAll,
}

impl DicePolicy {
    pub const ALL: [DicePolicy; 2] = [DicePolicy::OneIfPossible, DicePolicy::AlwaysAll];

    /// Number of dice this policy asks for, given the configured dice count.
    #[inline]
    pub fn num_dice(self, configured: u8) -> u8 {
        match self {
            DicePolicy::OneIfPossible => 1,
            DicePolicy::AlwaysAll => configured,
        }
    }

    /// True if a single die is both allowed (`open_sum <= max_single_sum`) and preferred.
    #[inline]
    pub fn uses_single_die(self, configured: u8, open_sum: u32, max_single_sum: u32) -> bool {
        open_sum <= max_single_sum && self.num_dice(configured) == 1
    }

    pub fn name(self) -> &'static str {
        match self {
            DicePolicy::OneIfPossible => "one_if_possible",
            DicePolicy::AlwaysAll => "always_all",
        }
    }
}

/// Which flap-closing strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlapStrategy {
    /// Prefer closing the highest-numbered flaps, fewest flaps first.
    Highest,
    /// Prefer closing as many low-numbered flaps as possible.
    Lowest,
    /// Maximize the probability that the next roll can close something.
    #[default]
    NextRollProbability,
    /// Follow a precomputed optimal-strategy table.
    Table,
}

impl FlapStrategy {
    pub const ALL: [FlapStrategy; 4] = [
        FlapStrategy::Highest,
        FlapStrategy::Lowest,
        FlapStrategy::NextRollProbability,
        FlapStrategy::Table,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FlapStrategy::Highest => "highest",
            FlapStrategy::Lowest => "lowest",
            FlapStrategy::NextRollProbability => "next_roll_probability",
            FlapStrategy::Table => "table",
        }
    }
}

impl fmt::Display for DicePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FlapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DicePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_if_possible" | "one" => Ok(DicePolicy::OneIfPossible),
            "always_all" | "all" => Ok(DicePolicy::AlwaysAll),
            other => Err(format!(
                "unknown dice policy: {other} (expected one_if_possible|always_all)"
            )),
        }
    }
}

impl FromStr for FlapStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highest" => Ok(FlapStrategy::Highest),
            "lowest" => Ok(FlapStrategy::Lowest),
            "next_roll_probability" | "next_roll" | "default" => {
                Ok(FlapStrategy::NextRollProbability)
            }
            "table" | "bill" => Ok(FlapStrategy::Table),
            other => Err(format!(
                "unknown flap strategy: {other} (expected highest|lowest|next_roll_probability|table)"
            )),
        }
    }
}
