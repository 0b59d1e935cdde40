//! stb-logging: NDJSON events, run manifests and the debug switch.
//!
//! Simulations append one JSON object per roll and per turn so that runs can be
//! analysed offline. Human-readable debug output goes to stderr and is enabled with
//! `STB_DEBUG_LOG=1`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event schema version.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Run manifest schema version.
pub const SIM_MANIFEST_VERSION: u32 = 1;

/// Ruleset identifier written into every event.
pub const RULESET_ID: &str = "shut_the_box_single_die_v1";

/// True if `STB_DEBUG_LOG` is set to `1`, `true` or `yes` (read once).
pub fn debug_enabled() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| matches!(std::env::var("STB_DEBUG_LOG").as_deref(), Ok("1" | "true" | "yes")))
}

/// `eprintln!` that only prints when [`debug_enabled`] is true.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::debug_enabled() {
            eprintln!($($arg)*);
        }
    };
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Schema/ruleset block carried by every event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfoV1 {
    pub event_schema_version: u32,
    pub ruleset_id: String,
}

impl Default for VersionInfoV1 {
    fn default() -> Self {
        Self {
            event_schema_version: EVENT_SCHEMA_VERSION,
            ruleset_id: RULESET_ID.to_string(),
        }
    }
}

/// One dice roll within a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub turn: u64,
    pub roll: u32,

    pub open_before: Vec<u8>,
    pub dice_rolled: u8,
    pub total: u32,
    /// Flaps closed by this roll; empty when no legal move existed.
    pub closed: Vec<u8>,
    pub flap_strategy: String,
    pub dice_policy: String,
}

/// One finished turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub turn: u64,
    pub rolls: u32,
    /// Sum of flaps left open.
    pub score: u32,
    pub shut: bool,
}

/// Summary of a simulation run.
///
/// Written atomically when the run starts and again, with results, when it finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimManifestV1 {
    pub sim_manifest_version: u32,

    pub run_id: String,
    pub created_ts_ms: u64,
    pub ruleset_id: String,

    pub config_hash: Option<String>,

    pub flap_strategy: String,
    pub dice_policy: String,
    pub num_flaps: u8,
    pub num_dice: u8,
    pub seed: u64,

    pub turns_requested: u64,
    pub turns_completed: u64,
    pub mean_score: Option<f64>,
    pub shut_rate: Option<f64>,
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<SimManifestV1, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<SimManifestV1>(&bytes)?)
}

pub fn write_manifest_atomic(path: impl AsRef<Path>, m: &SimManifestV1) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(m)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdjsonError::Io(e) => write!(f, "event log io error: {e}"),
            NdjsonError::Json(e) => write!(f, "event log json error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
