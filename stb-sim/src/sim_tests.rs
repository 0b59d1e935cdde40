use std::fs;

use serde_json::Value;
use stb_core::{ChanceKind, Dice, DicePolicy, FlapSet, FlapStrategy, StbConfig};
use stb_engine::{DecisionEngine, DecisionError, EngineSettings};
use stb_logging::read_manifest;

use crate::{
    format_histogram, simulate, strategy_differences, summarize_scores, ComputerTurn, SimError,
};

fn engine() -> DecisionEngine {
    DecisionEngine::new(EngineSettings::default()).unwrap()
}

fn config(turns: u32, seed: u64) -> StbConfig {
    let mut cfg = StbConfig::default();
    cfg.simulation.turns = turns;
    cfg.simulation.seed = seed;
    cfg
}

#[test]
fn every_strategy_plays_legal_turns() {
    let e = engine();
    for strategy in [
        FlapStrategy::Highest,
        FlapStrategy::Lowest,
        FlapStrategy::NextRollProbability,
    ] {
        for policy in DicePolicy::ALL {
            let dice = Dice::new_rng(2, 42).unwrap();
            let mut turn = ComputerTurn::new(&e, dice, strategy, policy).unwrap();
            for _ in 0..200 {
                let r = turn.perform_turn().unwrap();
                assert!(r.score <= 45, "{strategy} {policy}: score {}", r.score);
                assert!(r.rolls >= 1);
                assert_eq!(r.shut, r.score == 0);
                // Box is reset for the next turn.
                assert_eq!(turn.flap_box().sum_open(), 45);
            }
            assert_eq!(turn.turns_played(), 200);
        }
    }
}

#[test]
fn perform_roll_lowers_exactly_the_roll() {
    let e = engine();
    let dice = Dice::new_rng(2, 7).unwrap();
    let mut turn = ComputerTurn::new(
        &e,
        dice,
        FlapStrategy::NextRollProbability,
        DicePolicy::AlwaysAll,
    )
    .unwrap();
    for _ in 0..50 {
        turn.flap_box_mut().reset();
        let before = turn.flap_box().sum_open();
        let out = turn.perform_roll().unwrap();
        assert_eq!(out.dice_rolled, 2);
        assert!((2..=12).contains(&out.total));
        // Every total 2..=12 can be closed from a full box.
        let closed = out.closed.unwrap();
        assert_eq!(closed.iter().map(|&f| f as u32).sum::<u32>(), out.total);
        assert_eq!(turn.flap_box().sum_open(), before - out.total);
    }
}

#[test]
fn single_die_when_policy_and_sum_allow() {
    let e = engine();
    let dice = Dice::new_rng(2, 3).unwrap();
    let mut turn =
        ComputerTurn::new(&e, dice, FlapStrategy::Highest, DicePolicy::OneIfPossible).unwrap();

    turn.flap_box_mut().lower_except(FlapSet::from_flaps(&[1]));
    let out = turn.perform_roll().unwrap();
    assert_eq!(out.dice_rolled, 1);
    assert!((1..=6).contains(&out.total));
    if out.total == 1 {
        assert_eq!(out.closed, Some(vec![1]));
        assert!(turn.flap_box().is_shut());
    } else {
        assert_eq!(out.closed, None);
        assert_eq!(turn.flap_box().sum_open(), 1);
    }

    // Sum 7 is above the single-die threshold.
    turn.flap_box_mut().reset();
    turn.flap_box_mut().lower_except(FlapSet::from_flaps(&[3, 4]));
    assert_eq!(turn.perform_roll().unwrap().dice_rolled, 2);
}

#[test]
fn table_strategy_without_table_is_an_error() {
    let e = engine();
    let dice = Dice::new_rng(2, 0).unwrap();
    let mut turn =
        ComputerTurn::new(&e, dice, FlapStrategy::Table, DicePolicy::OneIfPossible).unwrap();
    match turn.perform_turn() {
        Err(SimError::Decision(DecisionError::TableUnavailable)) => {}
        other => panic!("expected TableUnavailable, got {other:?}"),
    }
}

#[test]
fn mismatched_dice_are_rejected() {
    let e = engine();
    let dice = Dice::new_rng(3, 0).unwrap();
    assert!(matches!(
        ComputerTurn::new(&e, dice, FlapStrategy::Highest, DicePolicy::AlwaysAll),
        Err(SimError::Mismatch(_))
    ));
}

#[test]
fn same_seed_same_scores() {
    let e = engine();
    let a = simulate(&config(300, 11), &e, false).unwrap();
    let b = simulate(&config(300, 11), &e, false).unwrap();
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.rolls, b.rolls);
    assert_eq!(a.scores.len(), 300);
    assert!(a.manifest_path.is_none());

    let mut det = config(300, 11);
    det.simulation.chance = ChanceKind::Deterministic;
    let c = simulate(&det, &e, false).unwrap();
    let d = simulate(&det, &e, false).unwrap();
    assert_eq!(c.scores, d.scores);
}

#[test]
fn simulate_writes_events_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.ndjson");
    let mut cfg = config(25, 5);
    cfg.logging.events_path = Some(events.clone());

    let report = simulate(&cfg, &engine(), false).unwrap();

    let text = fs::read_to_string(&events).unwrap();
    let vals: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let turns: Vec<&Value> = vals.iter().filter(|v| v["event"] == "turn").collect();
    let rolls = vals.iter().filter(|v| v["event"] == "roll").count();
    assert_eq!(turns.len(), 25);
    assert_eq!(rolls as u64, report.rolls);
    for (t, s) in turns.iter().zip(&report.scores) {
        assert_eq!(t["score"].as_u64(), Some(*s as u64));
    }

    let m = read_manifest(report.manifest_path.unwrap()).unwrap();
    assert_eq!(m.turns_requested, 25);
    assert_eq!(m.turns_completed, 25);
    assert_eq!(m.flap_strategy, "next_roll_probability");
    assert!(m.config_hash.is_some());
}

#[test]
fn summary_statistics() {
    let s = summarize_scores(&[0, 2, 4, 10]);
    assert_eq!(s.mean, 4.0);
    assert_eq!(s.median, 4);
    assert!((s.std_dev - 14f64.sqrt()).abs() < 1e-12);
    assert_eq!((s.min, s.max), (0, 10));
    assert_eq!(s.shut_rate, 0.25);

    let empty = summarize_scores(&[]);
    assert_eq!(empty.mean, 0.0);
    assert_eq!(empty.shut_rate, 0.0);
}

#[test]
fn histogram_mentions_every_bucket() {
    let h = format_histogram(&[0, 3, 7, 12]);
    assert!(h.contains("N=4"));
    assert!(h.contains("  0-  4"));
    assert!(h.contains(" 10- 14"));
    assert!(h.contains("shut=25.0%"));
    assert!(format_histogram(&[]).contains("no turns"));
}

#[test]
fn highest_and_next_roll_disagree_on_known_case() {
    let e = engine();
    let diffs = strategy_differences(
        &e,
        FlapStrategy::Highest,
        FlapStrategy::NextRollProbability,
        DicePolicy::OneIfPossible,
        5..=5,
        2..=12,
    )
    .unwrap();
    let case = diffs
        .iter()
        .find(|d| d.open == FlapSet::from_flaps(&[1, 2, 3, 4, 5]) && d.total == 7)
        .expect("known disagreement");
    assert_eq!(case.a, vec![2, 5]);
    assert_eq!(case.b, Some(vec![3, 4]));
    for d in &diffs {
        assert_eq!(d.open.len(), 5);
        assert_ne!(Some(&d.a), d.b.as_ref());
    }
}

#[test]
fn a_strategy_never_differs_from_itself() {
    let diffs = strategy_differences(
        &engine(),
        FlapStrategy::Lowest,
        FlapStrategy::Lowest,
        DicePolicy::AlwaysAll,
        1..=9,
        2..=12,
    )
    .unwrap();
    assert!(diffs.is_empty());
}
