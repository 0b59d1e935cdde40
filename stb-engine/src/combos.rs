//! Subset search over open flaps.
//!
//! All searches drop flaps larger than the target first; such flaps can never be part
//! of an exact-sum subset. Returned combinations are always ascending.

use stb_core::FlapSet;

/// Which of several equal-feasibility combinations to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// A single exact flap if there is one, else the fewest flaps, using the highest numbers.
    PreferHighest,
    /// The most flaps, using the lowest numbers.
    PreferLowest,
}

/// k-combinations of a slice, in lexicographic order of positions.
///
/// For `pool = [a, b, c]` and `k = 2` this yields `[a, b], [a, c], [b, c]`.
pub struct Combinations<'a> {
    pool: &'a [u8],
    idx: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> Combinations<'a> {
    pub fn new(pool: &'a [u8], k: usize) -> Self {
        Self {
            pool,
            idx: (0..k).collect(),
            started: false,
            done: k > pool.len(),
        }
    }

    fn advance(&mut self) -> bool {
        let n = self.pool.len();
        let k = self.idx.len();
        // Rightmost position that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.idx[i] != i + n - k) else {
            return false;
        };
        self.idx[i] += 1;
        for j in (i + 1)..k {
            self.idx[j] = self.idx[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.idx.iter().map(|&i| self.pool[i]).collect())
    }
}

#[inline]
fn combo_sum(c: &[u8]) -> u32 {
    c.iter().map(|&f| f as u32).sum()
}

/// Find a subset of `flaps` summing to exactly `target`.
///
/// Returns `None` if no subset of any length works.
pub fn find_combination(flaps: FlapSet, target: u32, tie: TieBreak) -> Option<Vec<u8>> {
    let ascending = flaps.at_most(target).to_vec();
    if ascending.is_empty() {
        return None;
    }
    match tie {
        TieBreak::PreferHighest => {
            if u8::try_from(target).is_ok_and(|t| ascending.contains(&t)) {
                return Some(vec![target as u8]);
            }
            let descending: Vec<u8> = ascending.iter().rev().copied().collect();
            for len in 2..=descending.len() {
                if let Some(mut c) =
                    Combinations::new(&descending, len).find(|c| combo_sum(c) == target)
                {
                    c.reverse();
                    return Some(c);
                }
            }
            None
        }
        TieBreak::PreferLowest => {
            for len in (1..=ascending.len()).rev() {
                if let Some(c) = Combinations::new(&ascending, len).find(|c| combo_sum(c) == target)
                {
                    return Some(c);
                }
            }
            None
        }
    }
}

/// Every subset of `flaps` summing to `target`.
///
/// Order: fewest flaps first; within a length, lexicographic over the flaps sorted
/// descending (so higher-numbered flaps come first). Each combination is ascending.
pub fn all_combinations(flaps: FlapSet, target: u32) -> Vec<Vec<u8>> {
    let descending: Vec<u8> = flaps.at_most(target).iter().rev().collect();
    let mut out = Vec::new();
    for len in 1..=descending.len() {
        for mut c in Combinations::new(&descending, len) {
            if combo_sum(&c) == target {
                c.reverse();
                out.push(c);
            }
        }
    }
    out
}

/// Bitset of every total reachable by a nonempty subset of `flaps` (bit `t` = total `t`).
///
/// Flap sums never exceed `1 + 2 + ... + 15 = 120`, so a `u128` holds every total.
pub fn subset_sums(flaps: FlapSet) -> u128 {
    let mut reach: u128 = 0;
    for f in flaps.iter() {
        reach |= (reach << f) | (1u128 << f);
    }
    reach
}

/// True if bit `total` is set in a [`subset_sums`] bitset.
#[inline]
pub fn reachable(reach: u128, total: u32) -> bool {
    total < 128 && (reach >> total) & 1 != 0
}

/// True if some nonempty subset of `flaps` sums to `target`.
#[inline]
pub fn has_combination(flaps: FlapSet, target: u32) -> bool {
    reachable(subset_sums(flaps), target)
}
