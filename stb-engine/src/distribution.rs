//! Distribution of dice totals.
//!
//! Built by enumerating every ordered face tuple of `n` dice (6^n outcomes) and
//! counting how often each total occurs. Counts are exact integers; probabilities are
//! `count / 6^n`, so building the same distribution twice gives identical bits.

use stb_core::chance::{DIE_FACES, MAX_DICE};

#[derive(Debug, Clone, PartialEq)]
pub struct DiceDistribution {
    num_dice: u8,
    /// `counts[t]` = number of face tuples with total `t`.
    counts: Vec<u64>,
    /// `probs[t]` = `counts[t] / outcomes`.
    probs: Vec<f64>,
    outcomes: u64,
}

/// Enumerate all face tuples for `num_dice` dice and tabulate totals.
///
/// # Panics
/// Panics if `num_dice` is 0 or above `MAX_DICE`.
pub fn dice_sum_distribution(num_dice: u8) -> DiceDistribution {
    assert!(
        (1..=MAX_DICE).contains(&num_dice),
        "num_dice out of range: {}",
        num_dice
    );
    let n = num_dice as usize;
    let faces = DIE_FACES as u8;
    let max_total = n * DIE_FACES as usize;

    let mut counts = vec![0u64; max_total + 1];
    let mut outcomes = 0u64;

    // Odometer over face tuples, last die spinning fastest.
    let mut tuple = vec![1u8; n];
    loop {
        let total: usize = tuple.iter().map(|&f| f as usize).sum();
        counts[total] += 1;
        outcomes += 1;

        let mut i = n;
        loop {
            if i == 0 {
                let probs = counts
                    .iter()
                    .map(|&c| c as f64 / outcomes as f64)
                    .collect();
                return DiceDistribution {
                    num_dice,
                    counts,
                    probs,
                    outcomes,
                };
            }
            i -= 1;
            if tuple[i] < faces {
                tuple[i] += 1;
                break;
            }
            tuple[i] = 1;
        }
    }
}

impl DiceDistribution {
    pub fn num_dice(&self) -> u8 {
        self.num_dice
    }

    /// Total number of face tuples (6^n).
    pub fn outcomes(&self) -> u64 {
        self.outcomes
    }

    /// Number of face tuples that produce `total`.
    pub fn count(&self, total: u32) -> u64 {
        self.counts.get(total as usize).copied().unwrap_or(0)
    }

    /// Probability of rolling `total`; 0 for impossible totals.
    pub fn probability(&self, total: u32) -> f64 {
        self.probs.get(total as usize).copied().unwrap_or(0.0)
    }

    pub fn min_total(&self) -> u32 {
        self.num_dice as u32
    }

    pub fn max_total(&self) -> u32 {
        self.num_dice as u32 * DIE_FACES
    }

    /// Achievable totals with their probabilities, ascending by total.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.probs
            .iter()
            .enumerate()
            .filter(|&(t, _)| self.counts[t] > 0)
            .map(|(t, &p)| (t as u32, p))
    }

    /// Number of distinct achievable totals.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes == 0
    }

    /// Most likely total (lowest one on ties).
    pub fn mode(&self) -> u32 {
        let mut best = (0u32, 0u64);
        for (t, &c) in self.counts.iter().enumerate() {
            if c > best.1 {
                best = (t as u32, c);
            }
        }
        best.0
    }
}
