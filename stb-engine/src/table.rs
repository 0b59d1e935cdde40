//! Optimal-strategy lookup table (single-die variant, nine flaps, two dice).
//!
//! Text layout:
//! - `TABLE_HEADER_LINES` lines of free text, ignored.
//! - Then up to `TABLE_ROWS` records, one per line, whitespace separated:
//!   - col 0: digits of the flaps already closed, `0` when none are closed
//!   - col 1: informational value, ignored
//!   - cols 2..=13: flaps to close for roll totals 1..=12, as digits; `0` = nothing
//!
//! Every nonblank cell must sum to its roll total, otherwise loading fails.

use std::path::Path;

use rustc_hash::FxHashMap;
use stb_core::FlapSet;
use thiserror::Error;

/// Free-text lines before the first record.
pub const TABLE_HEADER_LINES: usize = 21;

/// Box size the table is written for; cells hold single digits.
pub const TABLE_NUM_FLAPS: u8 = 9;

/// One record per subset of nine flaps.
pub const TABLE_ROWS: usize = 512;

/// Highest roll total with a column.
pub const TABLE_MAX_TOTAL: u32 = 12;

/// Column of roll total 1.
const FIRST_CELL_COL: usize = 2;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read strategy table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed strategy table at line {line}: {msg}")]
    Malformed { line: usize, msg: String },
}

fn malformed(line_idx: usize, msg: impl Into<String>) -> TableError {
    TableError::Malformed {
        line: line_idx + 1,
        msg: msg.into(),
    }
}

/// Closed flaps → (roll total → flaps to close).
#[derive(Debug, Clone, Default)]
pub struct OptimalTable {
    rows: FxHashMap<u16, [FlapSet; TABLE_MAX_TOTAL as usize]>,
}

impl OptimalTable {
    /// Read and validate a table file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse and validate table text.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut rows = FxHashMap::default();
        let records = text
            .lines()
            .enumerate()
            .skip(TABLE_HEADER_LINES)
            .filter(|(_, l)| !l.trim().is_empty())
            .take(TABLE_ROWS);

        for (line_idx, line) in records {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let needed = FIRST_CELL_COL + TABLE_MAX_TOTAL as usize;
            if cols.len() < needed {
                return Err(malformed(
                    line_idx,
                    format!("expected at least {needed} columns, got {}", cols.len()),
                ));
            }

            let closed = parse_digits(cols[0]).map_err(|msg| malformed(line_idx, msg))?;

            let mut cells = [FlapSet::EMPTY; TABLE_MAX_TOTAL as usize];
            for (i, cell) in cells.iter_mut().enumerate() {
                let total = i as u32 + 1;
                let flaps = parse_digits(cols[FIRST_CELL_COL + i])
                    .map_err(|msg| malformed(line_idx, format!("total {total}: {msg}")))?;
                if !flaps.is_empty() && flaps.sum() != total {
                    return Err(malformed(
                        line_idx,
                        format!(
                            "flaps to lower ({}) don't sum to dice sum {}",
                            cols[FIRST_CELL_COL + i],
                            total
                        ),
                    ));
                }
                *cell = flaps;
            }

            if rows.insert(closed.mask(), cells).is_some() {
                return Err(malformed(
                    line_idx,
                    format!("duplicate row for closed flaps {}", cols[0]),
                ));
            }
        }

        if rows.is_empty() {
            return Err(malformed(TABLE_HEADER_LINES, "no records after header"));
        }
        Ok(Self { rows })
    }

    /// Number of closed-flap records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Prescription for `closed` flaps and `total`.
    ///
    /// `None` if the table has no such record or column; `Some(EMPTY)` if the record
    /// prescribes nothing.
    pub fn lookup(&self, closed: FlapSet, total: u32) -> Option<FlapSet> {
        if total == 0 || total > TABLE_MAX_TOTAL {
            return None;
        }
        self.rows
            .get(&closed.mask())
            .map(|cells| cells[(total - 1) as usize])
    }
}

/// Digits `1..=9` of a cell as a flap set; `0` digits are ignored.
fn parse_digits(s: &str) -> Result<FlapSet, String> {
    let mut out = FlapSet::EMPTY;
    for c in s.chars() {
        let d = c
            .to_digit(10)
            .ok_or_else(|| format!("unexpected character {c:?} in {s:?}"))? as u8;
        if d == 0 {
            continue;
        }
        if out.contains(d) {
            return Err(format!("flap {d} repeated in {s:?}"));
        }
        out.insert(d);
    }
    Ok(out)
}
