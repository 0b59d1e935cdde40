//! Dice for Shut the Box.
//!
//! Two chance modes, mirroring how runs are used:
//! - `Rng`: a seeded ChaCha8 stream, for large batch simulations.
//! - `DeterministicEventKeyed`: faces derived from `(seed, turn_idx, roll_idx)`, so
//!   two strategies replayed on the same seed see identical dice for the same event.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of dice.
pub const DEFAULT_NUM_DICE: u8 = 2;

/// Upper bound on dice so that exhaustive 6^n enumeration stays cheap.
pub const MAX_DICE: u8 = 8;

/// Faces on each die.
pub const DIE_FACES: u32 = 6;

/// Structural event key for deterministic dice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub seed: u64,
    pub turn_idx: u32,
    pub roll_idx: u32,
}

/// SplitMix64 step.
fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_seed(key: EventKey) -> u64 {
    let mut x = key.seed;
    x ^= (key.turn_idx as u64).wrapping_mul(0xD6E8FEB86659FD93);
    x ^= (key.roll_idx as u64).wrapping_mul(0xA5A35625E4F7C1AD);
    let mut s = x;
    splitmix64_next(&mut s)
}

/// Deterministically generate `n` die faces for the given event key.
///
/// Rolling `k < n` dice for the same key yields the first `k` faces.
pub fn roll_faces(key: EventKey, n: u8) -> Vec<u8> {
    let mut state = mix_seed(key);
    (0..n)
        .map(|_| ((splitmix64_next(&mut state) % DIE_FACES as u64) + 1) as u8)
        .collect()
}

/// Which chance stream to use, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceKind {
    #[default]
    Rng,
    Deterministic,
}

/// How dice are generated.
pub enum ChanceMode {
    /// Faces derived from event keys; `turn_idx`/`roll_idx` advance as dice are rolled.
    DeterministicEventKeyed {
        seed: u64,
        turn_idx: u32,
        roll_idx: u32,
    },
    /// Pseudorandom faces from a small PRNG.
    Rng { rng: Box<ChaCha8Rng> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("num_dice must be in 1..={max}, got {got}")]
    InvalidDiceCount { got: u8, max: u8 },
    #[error("roll_dice must be an integer between 1 and {max}, got {got}")]
    InvalidRoll { got: u8, max: u8 },
}

/// The dice used in a game.
pub struct Dice {
    num_dice: u8,
    chance: ChanceMode,
}

impl Dice {
    pub fn new(num_dice: u8, chance: ChanceMode) -> Result<Self, DiceError> {
        if num_dice == 0 || num_dice > MAX_DICE {
            return Err(DiceError::InvalidDiceCount {
                got: num_dice,
                max: MAX_DICE,
            });
        }
        Ok(Self { num_dice, chance })
    }

    pub fn new_rng(num_dice: u8, seed: u64) -> Result<Self, DiceError> {
        Self::new(
            num_dice,
            ChanceMode::Rng {
                rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
            },
        )
    }

    pub fn new_deterministic(num_dice: u8, seed: u64) -> Result<Self, DiceError> {
        Self::new(
            num_dice,
            ChanceMode::DeterministicEventKeyed {
                seed,
                turn_idx: 0,
                roll_idx: 0,
            },
        )
    }

    pub fn from_kind(num_dice: u8, kind: ChanceKind, seed: u64) -> Result<Self, DiceError> {
        match kind {
            ChanceKind::Rng => Self::new_rng(num_dice, seed),
            ChanceKind::Deterministic => Self::new_deterministic(num_dice, seed),
        }
    }

    pub fn num_dice(&self) -> u8 {
        self.num_dice
    }

    /// Roll `n` of the dice and return the total.
    pub fn roll(&mut self, n: u8) -> Result<u32, DiceError> {
        if n == 0 || n > self.num_dice {
            return Err(DiceError::InvalidRoll {
                got: n,
                max: self.num_dice,
            });
        }
        let total = match &mut self.chance {
            ChanceMode::DeterministicEventKeyed {
                seed,
                turn_idx,
                roll_idx,
            } => {
                let key = EventKey {
                    seed: *seed,
                    turn_idx: *turn_idx,
                    roll_idx: *roll_idx,
                };
                *roll_idx += 1;
                roll_faces(key, n).iter().map(|&f| f as u32).sum()
            }
            ChanceMode::Rng { rng } => (0..n).map(|_| rng.gen_range(1..=DIE_FACES)).sum(),
        };
        Ok(total)
    }

    /// Roll every die.
    pub fn roll_all(&mut self) -> u32 {
        // num_dice >= 1 is checked at construction.
        self.roll(self.num_dice).unwrap_or_default()
    }

    /// Mark the start of a new turn (advances the deterministic event key).
    pub fn start_turn(&mut self) {
        if let ChanceMode::DeterministicEventKeyed {
            turn_idx, roll_idx, ..
        } = &mut self.chance
        {
            *turn_idx = turn_idx.wrapping_add(1);
            *roll_idx = 0;
        }
    }
}
