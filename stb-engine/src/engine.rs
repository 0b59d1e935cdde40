//! Decision engine for an automated Shut the Box player.
//!
//! The engine owns the dice-total distribution for "all dice" (built once) and an
//! optional optimal-strategy table (loaded once). After construction it is read-only:
//! every decision is a pure function of its arguments and that state.

use stb_core::chance::DIE_FACES;
use stb_core::{
    DicePolicy, FlapSet, FlapStrategy, StbConfig, DEFAULT_NUM_DICE, DEFAULT_NUM_FLAPS,
    DEFAULT_SINGLE_DIE_MAX_SUM, MAX_DICE, MAX_FLAPS,
};
use thiserror::Error;

use crate::combos::{all_combinations, find_combination, reachable, subset_sums, TieBreak};
use crate::distribution::{dice_sum_distribution, DiceDistribution};
use crate::table::{OptimalTable, TableError, TABLE_MAX_TOTAL, TABLE_NUM_FLAPS};

/// Probabilities closer than this are treated as equal when ranking candidates.
pub const TIE_EPSILON: f64 = 1e-12;

/// Box and dice shape the engine decides for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub num_flaps: u8,
    pub num_dice: u8,
    /// A single die may be rolled once the open flaps sum to this or less.
    pub single_die_max_sum: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            num_flaps: DEFAULT_NUM_FLAPS,
            num_dice: DEFAULT_NUM_DICE,
            single_die_max_sum: DEFAULT_SINGLE_DIE_MAX_SUM,
        }
    }
}

impl From<&StbConfig> for EngineSettings {
    fn from(cfg: &StbConfig) -> Self {
        Self {
            num_flaps: cfg.game.num_flaps,
            num_dice: cfg.game.num_dice,
            single_die_max_sum: cfg.game.single_die_max_sum,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Misconfigured decision request. Fatal to the call; a run should stop on these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("optimal-strategy table not loaded; the table strategy is unavailable")]
    TableUnavailable,
    #[error("table strategy assumes single-die play when eligible, but dice policy {policy} rolls {dice} dice")]
    IncompatibleDicePolicy { policy: DicePolicy, dice: u8 },
    #[error("optimal-strategy table describes {table_flaps} flaps and totals up to {table_max_total}, but the box has {num_flaps} flaps and {num_dice} dice")]
    TableShapeMismatch {
        num_flaps: u8,
        num_dice: u8,
        table_flaps: u8,
        table_max_total: u32,
    },
    #[error("optimal-strategy table has no entry for closed flaps [{closed}] and total {total}")]
    MissingTableEntry { closed: FlapSet, total: u32 },
    #[error("optimal-strategy table prescribes [{flaps}] but open flaps are [{open}]")]
    PrescriptionNotOpen { flaps: FlapSet, open: FlapSet },
}

/// A closing candidate with the success probability of the flaps it leaves open.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub flaps: Vec<u8>,
    pub next_roll_probability: f64,
}

pub struct DecisionEngine {
    settings: EngineSettings,
    /// Totals of rolling every die.
    all_dice: DiceDistribution,
    /// Totals of rolling one die (uniform over 1..=6).
    one_die: DiceDistribution,
    table: Option<OptimalTable>,
}

impl DecisionEngine {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        if settings.num_flaps == 0 || settings.num_flaps > MAX_FLAPS {
            return Err(EngineError::InvalidSettings(format!(
                "num_flaps must be in 1..={MAX_FLAPS}, got {}",
                settings.num_flaps
            )));
        }
        if settings.num_dice == 0 || settings.num_dice > MAX_DICE {
            return Err(EngineError::InvalidSettings(format!(
                "num_dice must be in 1..={MAX_DICE}, got {}",
                settings.num_dice
            )));
        }
        Ok(Self {
            settings,
            all_dice: dice_sum_distribution(settings.num_dice),
            one_die: dice_sum_distribution(1),
            table: None,
        })
    }

    /// Attach a loaded optimal-strategy table.
    pub fn with_table(mut self, table: OptimalTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Build from a run config, loading the table if `strategy.table_path` is set.
    pub fn from_config(cfg: &StbConfig) -> Result<Self, EngineError> {
        let engine = Self::new(EngineSettings::from(cfg))?;
        match &cfg.strategy.table_path {
            Some(path) => Ok(engine.with_table(OptimalTable::load(path)?)),
            None => Ok(engine),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Distribution of totals when every die is rolled.
    pub fn distribution(&self) -> &DiceDistribution {
        &self.all_dice
    }

    pub fn table(&self) -> Option<&OptimalTable> {
        self.table.as_ref()
    }

    /// Whether the rules allow a single die with these flaps open.
    #[inline]
    pub fn single_die_allowed(&self, open: FlapSet) -> bool {
        open.sum() <= self.settings.single_die_max_sum
    }

    /// How many dice to actually roll: the policy's preference, if the rules allow it.
    pub fn dice_to_roll(&self, open: FlapSet, policy: DicePolicy) -> u8 {
        if policy.uses_single_die(
            self.settings.num_dice,
            open.sum(),
            self.settings.single_die_max_sum,
        ) {
            1
        } else {
            self.settings.num_dice
        }
    }

    /// Probability that the next roll leaves at least one closing combination in `open`,
    /// assuming `policy` picks the number of dice.
    pub fn success_probability(&self, open: FlapSet, policy: DicePolicy) -> f64 {
        if open.is_empty() {
            return 0.0;
        }
        let dist = if self.dice_to_roll(open, policy) == 1 {
            &self.one_die
        } else {
            &self.all_dice
        };
        let reach = subset_sums(open);
        dist.iter()
            .filter(|&(total, _)| reachable(reach, total))
            .map(|(_, p)| p)
            .sum()
    }

    /// Close the highest-numbered flaps possible (a single exact flap if available).
    pub fn close_highest(&self, open: FlapSet, roll_total: u32) -> Option<Vec<u8>> {
        find_combination(open, roll_total, TieBreak::PreferHighest)
    }

    /// Close as many low-numbered flaps as possible.
    pub fn close_lowest(&self, open: FlapSet, roll_total: u32) -> Option<Vec<u8>> {
        find_combination(open, roll_total, TieBreak::PreferLowest)
    }

    /// Every closing combination with the success probability of what it leaves open,
    /// in enumeration order (fewest flaps first, higher numbers first).
    pub fn scored_candidates(
        &self,
        open: FlapSet,
        roll_total: u32,
        policy: DicePolicy,
    ) -> Vec<ScoredCandidate> {
        all_combinations(open, roll_total)
            .into_iter()
            .map(|flaps| {
                let remaining = open.without(FlapSet::from_flaps(&flaps));
                ScoredCandidate {
                    next_roll_probability: self.success_probability(remaining, policy),
                    flaps,
                }
            })
            .collect()
    }

    /// Close the combination that maximizes the next roll's success probability.
    ///
    /// Ties (within `TIE_EPSILON`) keep the earliest candidate in enumeration order, i.e.
    /// the fewest flaps, then the highest-numbered ones.
    pub fn close_next_roll_probability(
        &self,
        open: FlapSet,
        roll_total: u32,
        policy: DicePolicy,
    ) -> Option<Vec<u8>> {
        let mut best: Option<ScoredCandidate> = None;
        for cand in self.scored_candidates(open, roll_total, policy) {
            let better = match &best {
                None => true,
                Some(b) => cand.next_roll_probability > b.next_roll_probability + TIE_EPSILON,
            };
            if better {
                best = Some(cand);
            }
        }
        best.map(|b| b.flaps)
    }

    /// Close what the optimal-strategy table prescribes.
    pub fn close_from_table(
        &self,
        open: FlapSet,
        roll_total: u32,
        policy: DicePolicy,
    ) -> Result<Option<Vec<u8>>, DecisionError> {
        let table = self.table.as_ref().ok_or(DecisionError::TableUnavailable)?;

        let EngineSettings {
            num_flaps,
            num_dice,
            ..
        } = self.settings;
        if num_flaps != TABLE_NUM_FLAPS || num_dice as u32 * DIE_FACES > TABLE_MAX_TOTAL {
            return Err(DecisionError::TableShapeMismatch {
                num_flaps,
                num_dice,
                table_flaps: TABLE_NUM_FLAPS,
                table_max_total: TABLE_MAX_TOTAL,
            });
        }

        let dice = policy.num_dice(self.settings.num_dice);
        if dice != 1 {
            return Err(DecisionError::IncompatibleDicePolicy { policy, dice });
        }

        let closed = FlapSet::full(self.settings.num_flaps).without(open);
        let flaps = table
            .lookup(closed, roll_total)
            .ok_or(DecisionError::MissingTableEntry {
                closed,
                total: roll_total,
            })?;
        if flaps.is_empty() {
            return Ok(None);
        }
        if !flaps.is_subset_of(open) {
            return Err(DecisionError::PrescriptionNotOpen { flaps, open });
        }
        Ok(Some(flaps.to_vec()))
    }

    /// Choose which flaps to close for `roll_total` under `strategy`.
    ///
    /// `Ok(None)` means no legal move. Any `Ok(Some(c))` is nonempty, a subset of `open`,
    /// ascending, and sums to `roll_total`.
    pub fn choose_flaps(
        &self,
        strategy: FlapStrategy,
        open: FlapSet,
        roll_total: u32,
        policy: DicePolicy,
    ) -> Result<Option<Vec<u8>>, DecisionError> {
        match strategy {
            FlapStrategy::Highest => Ok(self.close_highest(open, roll_total)),
            FlapStrategy::Lowest => Ok(self.close_lowest(open, roll_total)),
            FlapStrategy::NextRollProbability => {
                Ok(self.close_next_roll_probability(open, roll_total, policy))
            }
            FlapStrategy::Table => self.close_from_table(open, roll_total, policy),
        }
    }
}
