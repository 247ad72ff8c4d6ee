//! Inclusive serial-range matching over dataset rows.

use serde::Serialize;
use tracing::trace;

use crate::dataset::DatasetRow;
use crate::serial::{SerialKey, extract_serial_key};

/// A row whose `[from, to]` range contains the target key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeMatch<'a> {
    /// Zero-based position of the row in the input sequence.
    pub index: usize,
    /// The matched row.
    pub row: &'a DatasetRow,
    /// Extracted lower bound.
    pub from: SerialKey,
    /// Extracted upper bound.
    pub to: SerialKey,
}

/// Extract the `[from, to]` bounds of a row, or `None` when the row is not
/// a valid range record (missing/empty boundary cell, or a boundary with no
/// extractable key).
pub fn range_bounds(
    row: &DatasetRow,
    from_column: &str,
    to_column: &str,
) -> Option<(SerialKey, SerialKey)> {
    let from_cell = row.get(from_column).filter(|c| !c.is_empty())?;
    let to_cell = row.get(to_column).filter(|c| !c.is_empty())?;
    let from = extract_serial_key(&from_cell.to_string())?;
    let to = extract_serial_key(&to_cell.to_string())?;
    Some((from, to))
}

/// Every row whose inclusive range contains `target`, in input order.
///
/// Rows that are not valid range records are skipped, never reported as
/// errors. Duplicate matches are kept. An empty result means "not found";
/// the caller decides how to surface it.
pub fn find_matches<'a>(
    target: SerialKey,
    rows: &'a [DatasetRow],
    from_column: &str,
    to_column: &str,
) -> Vec<RangeMatch<'a>> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let Some((from, to)) = range_bounds(row, from_column, to_column) else {
                trace!(index, "skipping row without a valid serial range");
                return None;
            };
            (from <= target && target <= to).then_some(RangeMatch {
                index,
                row,
                from,
                to,
            })
        })
        .collect()
}
