//! stb-core: Shut the Box rules, dice, policy tags and configuration.

pub mod chance;
pub mod config;
pub mod flaps;
pub mod human;
pub mod policy;

pub use chance::{ChanceKind, ChanceMode, Dice, DiceError, EventKey, DEFAULT_NUM_DICE, MAX_DICE};
pub use config::{ConfigError, StbConfig};
pub use flaps::{FlapBox, FlapError, FlapSet, DEFAULT_NUM_FLAPS, MAX_FLAPS};
pub use human::{check_flaps, check_num_dice, InputError};
pub use policy::{DicePolicy, FlapStrategy, DEFAULT_SINGLE_DIE_MAX_SUM};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod human_tests;
