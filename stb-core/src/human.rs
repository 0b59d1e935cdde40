//! Validation of a human player's typed answers.
//!
//! Each check returns the parsed decision or an [`InputError`] whose `Display` text is
//! meant to be shown to the player before asking again.

use thiserror::Error;

use crate::flaps::FlapBox;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Number of dice chosen must be an integer between 1 and {max}")]
    BadDiceCount { max: u8 },
    #[error("You can only use a single die when the flap numbers add up to {max_sum} or less")]
    SingleDieNotAllowed { max_sum: u32 },
    #[error("{0} is not a valid flap number")]
    NotAFlap(String),
    #[error("Flap {0} is already down")]
    AlreadyDown(u8),
    #[error("Flaps chosen do not add up to dice total")]
    WrongTotal,
}

/// Parse how many dice the player wants to roll.
pub fn check_num_dice(
    input: &str,
    num_dice: u8,
    open_sum: u32,
    single_die_max_sum: u32,
) -> Result<u8, InputError> {
    let n: u8 = input
        .trim()
        .parse()
        .map_err(|_| InputError::BadDiceCount { max: num_dice })?;
    if n < 1 || n > num_dice {
        return Err(InputError::BadDiceCount { max: num_dice });
    }
    if n == 1 && open_sum > single_die_max_sum {
        return Err(InputError::SingleDieNotAllowed {
            max_sum: single_die_max_sum,
        });
    }
    Ok(n)
}

/// Parse which flaps the player wants to lower for `dice_total`.
///
/// Flap numbers are whitespace-separated; repeats are ignored. An empty answer means
/// the player lowers nothing and ends the turn (`Ok(vec![])`).
pub fn check_flaps(input: &str, flap_box: &FlapBox, dice_total: u32) -> Result<Vec<u8>, InputError> {
    let mut flaps: Vec<u8> = Vec::new();
    for tok in input.split_whitespace() {
        let n: u8 = tok
            .parse()
            .map_err(|_| InputError::NotAFlap(tok.to_string()))?;
        if !flaps.contains(&n) {
            flaps.push(n);
        }
    }

    for &n in &flaps {
        if n == 0 || n > flap_box.num_flaps() {
            return Err(InputError::NotAFlap(n.to_string()));
        }
        if !flap_box.is_open(n) {
            return Err(InputError::AlreadyDown(n));
        }
    }

    let total: u32 = flaps.iter().map(|&f| f as u32).sum();
    if !flaps.is_empty() && total != dice_total {
        return Err(InputError::WrongTotal);
    }
    Ok(flaps)
}
