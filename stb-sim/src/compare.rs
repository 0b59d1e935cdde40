//! Where two flap strategies disagree.

use std::fmt;
use std::ops::RangeInclusive;

use stb_core::{DicePolicy, FlapSet, FlapStrategy};
use stb_engine::{Combinations, DecisionEngine};

use crate::SimError;

/// One open-flaps/roll case where the strategies pick different flaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyDifference {
    pub open: FlapSet,
    pub total: u32,
    pub a: Vec<u8>,
    /// `None` if `b` found no move where `a` did.
    pub b: Option<Vec<u8>>,
}

impl fmt::Display for StrategyDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "flaps: {:?}", self.open.to_vec())?;
        writeln!(f, "dice sum: {}", self.total)?;
        writeln!(f, "a: {:?}", self.a)?;
        match &self.b {
            Some(b) => writeln!(f, "b: {b:?}"),
            None => writeln!(f, "b: none"),
        }
    }
}

/// Compare strategies `a` and `b` over every open set whose size is in `lengths`
/// (largest first) and every roll total in `totals`.
///
/// Each open set is abandoned at the first total for which `a` has no legal move.
pub fn strategy_differences(
    engine: &DecisionEngine,
    a: FlapStrategy,
    b: FlapStrategy,
    policy: DicePolicy,
    lengths: RangeInclusive<usize>,
    totals: RangeInclusive<u32>,
) -> Result<Vec<StrategyDifference>, SimError> {
    let pool: Vec<u8> = FlapSet::full(engine.settings().num_flaps).to_vec();
    let mut out = Vec::new();

    for len in lengths.rev() {
        if len == 0 || len > pool.len() {
            continue;
        }
        for flaps in Combinations::new(&pool, len) {
            let open = FlapSet::from_flaps(&flaps);
            for total in totals.clone() {
                let Some(chosen_a) = engine.choose_flaps(a, open, total, policy)? else {
                    break;
                };
                let chosen_b = engine.choose_flaps(b, open, total, policy)?;
                if chosen_b.as_ref() != Some(&chosen_a) {
                    out.push(StrategyDifference {
                        open,
                        total,
                        a: chosen_a,
                        b: chosen_b,
                    });
                }
            }
        }
    }
    Ok(out)
}
