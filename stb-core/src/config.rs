//! Run configuration for Shut the Box simulations.
//!
//! One YAML file describes the box, the decision strategy, the simulation run and
//! where events are logged. Every field has a default, so an empty document is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chance::{ChanceKind, DEFAULT_NUM_DICE, MAX_DICE};
use crate::flaps::{DEFAULT_NUM_FLAPS, MAX_FLAPS};
use crate::policy::{DicePolicy, FlapStrategy, DEFAULT_SINGLE_DIE_MAX_SUM};

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StbConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Box and dice settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Number of flaps on the box.
    #[serde(default = "default_num_flaps")]
    pub num_flaps: u8,
    /// Number of dice rolled when not rolling a single die.
    #[serde(default = "default_num_dice")]
    pub num_dice: u8,
    /// A single die may be rolled once the open flaps sum to this or less.
    #[serde(default = "default_single_die_max_sum")]
    pub single_die_max_sum: u32,
}

fn default_num_flaps() -> u8 {
    DEFAULT_NUM_FLAPS
}

fn default_num_dice() -> u8 {
    DEFAULT_NUM_DICE
}

fn default_single_die_max_sum() -> u32 {
    DEFAULT_SINGLE_DIE_MAX_SUM
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_flaps: default_num_flaps(),
            num_dice: default_num_dice(),
            single_die_max_sum: default_single_die_max_sum(),
        }
    }
}

/// Decision strategy settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub flap_strategy: FlapStrategy,
    #[serde(default)]
    pub dice_policy: DicePolicy,
    /// Optional optimal-strategy table file. Required by `flap_strategy: table`.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

/// Batch simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Number of turns to simulate.
    #[serde(default = "default_turns")]
    pub turns: u32,
    /// Seed for the dice stream.
    #[serde(default)]
    pub seed: u64,
    /// Which dice stream to use.
    #[serde(default)]
    pub chance: ChanceKind,
}

fn default_turns() -> u32 {
    10_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            turns: default_turns(),
            seed: 0,
            chance: ChanceKind::default(),
        }
    }
}

/// Event logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// If set, append NDJSON roll/turn events here.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
    /// Flush the event file every N lines (0 = only at the end).
    #[serde(default = "default_flush_every")]
    pub flush_every: u64,
}

fn default_flush_every() -> u64 {
    100
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            flush_every: default_flush_every(),
        }
    }
}

impl StbConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: StbConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.game;
        if g.num_flaps == 0 || g.num_flaps > MAX_FLAPS {
            return Err(ConfigError::Invalid(format!(
                "game.num_flaps must be in 1..={MAX_FLAPS}, got {}",
                g.num_flaps
            )));
        }
        if g.num_dice == 0 || g.num_dice > MAX_DICE {
            return Err(ConfigError::Invalid(format!(
                "game.num_dice must be in 1..={MAX_DICE}, got {}",
                g.num_dice
            )));
        }
        if self.strategy.flap_strategy == FlapStrategy::Table
            && self.strategy.table_path.is_none()
        {
            return Err(ConfigError::Invalid(
                "strategy.flap_strategy=table requires strategy.table_path".to_string(),
            ));
        }
        Ok(())
    }
}
