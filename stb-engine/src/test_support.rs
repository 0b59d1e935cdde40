//! Shared fixtures for unit tests.

pub(crate) const TABLE_ROWS_FIXTURE: [&str; 3] = [
    "0   0.1234  1  2  3  4  5  6  7  8  9  91 92 93",
    "9   0.2000  1  2  3  4  5  6  7  8  81 82 83 84",
    "12  0.3000  0  0  3  4  5  6  7  8  9  73 74 75",
];

/// Table text with the standard header followed by `rows`.
pub(crate) fn table_text(rows: &[&str]) -> String {
    let mut s = String::new();
    for i in 0..crate::table::TABLE_HEADER_LINES {
        s.push_str(&format!("header line {i}\n"));
    }
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    s
}
