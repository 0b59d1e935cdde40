use stb_core::FlapSet;

use crate::combos::{
    all_combinations, find_combination, has_combination, reachable, subset_sums, Combinations,
    TieBreak,
};

fn one_to(n: u8) -> FlapSet {
    FlapSet::full(n)
}

#[test]
fn combinations_lexicographic_order() {
    let pool = [1u8, 2, 3];
    let got: Vec<Vec<u8>> = Combinations::new(&pool, 2).collect();
    assert_eq!(got, vec![vec![1, 2], vec![1, 3], vec![2, 3]]);

    let pool = [9u8, 8, 7, 6, 5];
    assert_eq!(Combinations::new(&pool, 3).count(), 10);
    assert_eq!(Combinations::new(&pool, 5).count(), 1);
    assert_eq!(Combinations::new(&pool, 6).count(), 0);
}

#[test]
fn highest_single_flap() {
    assert_eq!(
        find_combination(one_to(9), 7, TieBreak::PreferHighest),
        Some(vec![7])
    );
}

#[test]
fn highest_two_flaps() {
    let mut flaps = one_to(9);
    flaps.remove(7);
    assert_eq!(
        find_combination(flaps, 7, TieBreak::PreferHighest),
        Some(vec![1, 6])
    );
    flaps.remove(6);
    assert_eq!(
        find_combination(flaps, 7, TieBreak::PreferHighest),
        Some(vec![2, 5])
    );
}

#[test]
fn highest_three_flaps() {
    assert_eq!(
        find_combination(one_to(4), 9, TieBreak::PreferHighest),
        Some(vec![2, 3, 4])
    );
}

#[test]
fn highest_impossible() {
    let flaps = FlapSet::from_flaps(&[1, 3, 4]);
    assert_eq!(find_combination(flaps, 10, TieBreak::PreferHighest), None);
}

#[test]
fn lowest_single_flap() {
    assert_eq!(
        find_combination(one_to(9), 2, TieBreak::PreferLowest),
        Some(vec![2])
    );
}

#[test]
fn lowest_two_flaps() {
    let mut flaps = one_to(9);
    assert_eq!(
        find_combination(flaps, 5, TieBreak::PreferLowest),
        Some(vec![1, 4])
    );
    flaps.remove(1);
    assert_eq!(
        find_combination(flaps, 5, TieBreak::PreferLowest),
        Some(vec![2, 3])
    );
}

#[test]
fn lowest_three_flaps() {
    assert_eq!(
        find_combination(one_to(9), 8, TieBreak::PreferLowest),
        Some(vec![1, 2, 5])
    );
}

#[test]
fn lowest_impossible() {
    let flaps = FlapSet::from_flaps(&[1, 3, 4]);
    assert_eq!(find_combination(flaps, 10, TieBreak::PreferLowest), None);
}

#[test]
fn empty_candidates_not_found() {
    let flaps = FlapSet::from_flaps(&[5, 6]);
    for tie in [TieBreak::PreferHighest, TieBreak::PreferLowest] {
        assert_eq!(find_combination(flaps, 4, tie), None);
        assert_eq!(find_combination(FlapSet::EMPTY, 4, tie), None);
        assert_eq!(find_combination(one_to(9), 0, tie), None);
    }
}

#[test]
fn all_combinations_enumeration_order() {
    assert_eq!(
        all_combinations(one_to(5), 7),
        vec![vec![2, 5], vec![3, 4], vec![1, 2, 4]]
    );
    assert!(all_combinations(FlapSet::from_flaps(&[3]), 2).is_empty());
}

#[test]
fn subset_sums_of_one_three_four() {
    let reach = subset_sums(FlapSet::from_flaps(&[1, 3, 4]));
    let totals: Vec<u32> = (0..128).filter(|&t| (reach >> t) & 1 != 0).collect();
    assert_eq!(totals, vec![1, 3, 4, 5, 7, 8]);

    assert_eq!(subset_sums(FlapSet::EMPTY), 0);
    let full = subset_sums(FlapSet::full(15));
    assert!((1..=120).all(|t| (full >> t) & 1 != 0));
}

#[test]
fn has_combination_matches_search() {
    let flaps = FlapSet::from_flaps(&[2, 5, 9]);
    for t in 0..20u32 {
        assert_eq!(
            has_combination(flaps, t),
            find_combination(flaps, t, TieBreak::PreferLowest).is_some(),
            "t={t}"
        );
    }
    assert!(!has_combination(flaps, 500));
}

#[test]
fn all_combinations_skips_flaps_above_target() {
    // 9 and 12 exceed the total and are never part of a candidate.
    let flaps = FlapSet::from_flaps(&[1, 2, 3, 5, 9, 12]);
    assert_eq!(
        all_combinations(flaps, 6),
        vec![vec![1, 5], vec![1, 2, 3]]
    );
}

#[test]
fn reachable_reads_subset_sum_bits() {
    let reach = subset_sums(FlapSet::from_flaps(&[2, 5]));
    let got: Vec<u32> = (0..10).filter(|&t| reachable(reach, t)).collect();
    assert_eq!(got, vec![2, 5, 7]);
    assert!(!reachable(u128::MAX, 128));
    assert!(!reachable(u128::MAX, 1000));
}
