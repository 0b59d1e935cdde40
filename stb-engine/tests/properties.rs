//! Property-based tests for the decision engine.

use proptest::prelude::*;

use stb_core::{DicePolicy, FlapSet, FlapStrategy};
use stb_engine::{
    dice_sum_distribution, find_combination, DecisionEngine, EngineSettings, TieBreak,
};

/// Strategy: a subset of 1..=12 as a flap set.
fn flaps_strategy() -> impl Strategy<Value = FlapSet> {
    (0u16..(1 << 12)).prop_map(|bits| FlapSet::from_mask(bits << 1))
}

/// Strategy: a plausible roll total for up to three dice.
fn total_strategy() -> impl Strategy<Value = u32> {
    1u32..=18
}

fn policy_strategy() -> impl Strategy<Value = DicePolicy> {
    prop_oneof![Just(DicePolicy::OneIfPossible), Just(DicePolicy::AlwaysAll)]
}

fn engine() -> DecisionEngine {
    DecisionEngine::new(EngineSettings {
        num_flaps: 12,
        ..EngineSettings::default()
    })
    .unwrap()
}

fn assert_valid_closure(open: FlapSet, total: u32, c: &[u8]) -> Result<(), TestCaseError> {
    prop_assert!(!c.is_empty());
    prop_assert!(c.windows(2).all(|w| w[0] < w[1]), "not ascending: {c:?}");
    let chosen = FlapSet::from_flaps(c);
    prop_assert!(chosen.is_subset_of(open), "{c:?} not in {open}");
    prop_assert_eq!(c.iter().map(|&f| f as u32).sum::<u32>(), total);
    // Closing the combination lowers the open sum by exactly the roll.
    prop_assert_eq!(open.sum() - open.without(chosen).sum(), total);
    Ok(())
}

proptest! {
    // 1. Search returns nothing or an exact-sum subset
    #[test]
    fn find_combination_is_exact_subset(open in flaps_strategy(), total in total_strategy()) {
        for tie in [TieBreak::PreferHighest, TieBreak::PreferLowest] {
            if let Some(c) = find_combination(open, total, tie) {
                assert_valid_closure(open, total, &c)?;
            }
        }
    }

    // 2. Both tie-breaks agree on feasibility
    #[test]
    fn tie_breaks_agree_on_feasibility(open in flaps_strategy(), total in total_strategy()) {
        let hi = find_combination(open, total, TieBreak::PreferHighest);
        let lo = find_combination(open, total, TieBreak::PreferLowest);
        prop_assert_eq!(hi.is_some(), lo.is_some());
    }

    // 3. Prefer-lowest never uses fewer flaps than prefer-highest
    #[test]
    fn lowest_uses_at_least_as_many_flaps(open in flaps_strategy(), total in total_strategy()) {
        if let (Some(hi), Some(lo)) = (
            find_combination(open, total, TieBreak::PreferHighest),
            find_combination(open, total, TieBreak::PreferLowest),
        ) {
            prop_assert!(lo.len() >= hi.len(), "hi={hi:?} lo={lo:?}");
        }
    }

    // 4. Every non-table strategy returns a valid closure, and all agree on feasibility
    #[test]
    fn strategies_return_valid_closures(
        open in flaps_strategy(),
        total in total_strategy(),
        policy in policy_strategy(),
    ) {
        let e = engine();
        let mut feasible = Vec::new();
        for s in [FlapStrategy::Highest, FlapStrategy::Lowest, FlapStrategy::NextRollProbability] {
            let got = e.choose_flaps(s, open, total, policy).unwrap();
            if let Some(c) = &got {
                assert_valid_closure(open, total, c)?;
            }
            feasible.push(got.is_some());
        }
        prop_assert!(feasible.iter().all(|&f| f == feasible[0]));
    }

    // 5. Success probability is a probability
    #[test]
    fn success_probability_in_unit_interval(open in flaps_strategy(), policy in policy_strategy()) {
        let p = engine().success_probability(open, policy);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&p), "p={p}");
    }

    // 6. The chosen next-roll candidate is at least as good as any other
    #[test]
    fn next_roll_choice_is_maximal(
        open in flaps_strategy(),
        total in total_strategy(),
        policy in policy_strategy(),
    ) {
        let e = engine();
        let cands = e.scored_candidates(open, total, policy);
        let chosen = e.close_next_roll_probability(open, total, policy);
        prop_assert_eq!(cands.is_empty(), chosen.is_none());
        if let Some(c) = chosen {
            let best = cands.iter().find(|s| s.flaps == c).unwrap().next_roll_probability;
            for s in &cands {
                prop_assert!(s.next_roll_probability <= best + 1e-9);
            }
        }
    }
}

#[test]
fn distributions_are_normalized() {
    for n in 1..=5u8 {
        let d = dice_sum_distribution(n);
        let sum: f64 = d.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9, "n={n} sum={sum}");
        assert_eq!(d.outcomes(), 6u64.pow(n as u32));
        assert_eq!(d.len(), 5 * n as usize + 1);
    }
}
