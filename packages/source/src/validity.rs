//! Row-level validity policy.
//!
//! Low-information rows are dropped before any typing or aggregation so
//! they never influence area statistics.

use serde::{Deserialize, Serialize};

use crate::parsing::{is_missing_cell, is_zero_cell};

/// Thresholds for dropping low-information rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityPolicy {
    /// A row is sparse once it is missing at least `total_fields - min_present`
    /// of its fields. Only applies to headers wider than `min_present`.
    pub min_present: usize,
    /// A row is zero-heavy once at least this many of its fields are zero.
    pub max_zero_fields: usize,
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        Self {
            min_present: 6,
            max_zero_fields: 8,
        }
    }
}

/// Outcome of checking one row against a [`ValidityPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVerdict {
    /// The row is kept.
    Keep,
    /// Too many missing fields.
    Sparse,
    /// Too many zero-valued fields.
    ZeroHeavy,
}

impl ValidityPolicy {
    /// Checks a row. `total_fields` is the header width; `cells` may be
    /// shorter than it (absent trailing cells count as missing).
    #[must_use]
    pub fn assess<'a, I>(&self, total_fields: usize, cells: I) -> RowVerdict
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = 0_usize;
        let mut missing = 0_usize;
        let mut zeros = 0_usize;

        for cell in cells.into_iter().take(total_fields) {
            seen += 1;
            if is_missing_cell(cell) {
                missing += 1;
            } else if is_zero_cell(cell) {
                zeros += 1;
            }
        }
        missing += total_fields.saturating_sub(seen);

        if total_fields > self.min_present && missing >= total_fields - self.min_present {
            RowVerdict::Sparse
        } else if zeros >= self.max_zero_fields {
            RowVerdict::ZeroHeavy
        } else {
            RowVerdict::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filled: usize, zeros: usize, total: usize) -> Vec<String> {
        let mut cells = Vec::with_capacity(total);
        cells.extend((0..filled).map(|i| format!("v{i}")));
        cells.extend((0..zeros).map(|_| "0".to_string()));
        cells.resize(total, String::new());
        cells
    }

    fn assess(policy: &ValidityPolicy, cells: &[String]) -> RowVerdict {
        policy.assess(cells.len(), cells.iter().map(String::as_str))
    }

    #[test]
    fn keeps_well_populated_rows() {
        let policy = ValidityPolicy::default();
        assert_eq!(assess(&policy, &row(20, 0, 22)), RowVerdict::Keep);
        assert_eq!(assess(&policy, &row(7, 0, 22)), RowVerdict::Keep);
    }

    #[test]
    fn drops_rows_missing_total_minus_six_fields() {
        let policy = ValidityPolicy::default();
        // 22 fields, 16 missing: missing == total - 6
        assert_eq!(assess(&policy, &row(6, 0, 22)), RowVerdict::Sparse);
        assert_eq!(assess(&policy, &row(2, 0, 22)), RowVerdict::Sparse);
    }

    #[test]
    fn seven_column_header_drops_on_one_missing() {
        let policy = ValidityPolicy::default();
        // one missing already reaches total - 6
        assert_eq!(assess(&policy, &row(7, 0, 7)), RowVerdict::Keep);
        assert_eq!(assess(&policy, &row(6, 0, 7)), RowVerdict::Sparse);
        assert_eq!(assess(&policy, &row(5, 2, 7)), RowVerdict::Keep);
    }

    #[test]
    fn short_rows_count_absent_cells_as_missing() {
        let policy = ValidityPolicy::default();
        let cells: Vec<&str> = vec!["a", "b", "c"];
        assert_eq!(policy.assess(22, cells), RowVerdict::Sparse);
    }

    #[test]
    fn drops_zero_heavy_rows() {
        let policy = ValidityPolicy::default();
        assert_eq!(assess(&policy, &row(10, 8, 22)), RowVerdict::ZeroHeavy);
        assert_eq!(assess(&policy, &row(10, 7, 22)), RowVerdict::Keep);
    }

    #[test]
    fn narrow_headers_are_not_judged_sparse() {
        let policy = ValidityPolicy::default();
        assert_eq!(assess(&policy, &row(2, 0, 5)), RowVerdict::Keep);
        assert_eq!(assess(&policy, &row(0, 0, 6)), RowVerdict::Keep);
    }

    #[test]
    fn null_markers_are_missing() {
        let policy = ValidityPolicy::default();
        let mut cells = row(7, 0, 22);
        assert_eq!(assess(&policy, &cells), RowVerdict::Keep);
        cells[0] = "nan".to_string();
        assert_eq!(assess(&policy, &cells), RowVerdict::Sparse);
    }
}
