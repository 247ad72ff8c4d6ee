//! Serial lookup against a loaded dataset.
//!
//! One lookup is: trim the input, resolve the range columns, extract the
//! target key, and collect every row whose range contains it. The first
//! matching row drives the label; the rest are kept for reporting.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::alias::{RANGE_FROM, RANGE_TO, resolve_column};
use crate::dataset::{Dataset, DatasetRow};
use crate::range::{RangeMatch, find_matches};
use crate::serial::{SerialKey, extract_serial_key};

/// Errors that abort a single lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// Input was empty after trimming.
    #[error("enter a serial number")]
    EmptyInput,
    /// The dataset has no column matching one of the range alias groups.
    #[error("dataset has no serial range columns (columns: {})", available.join(", "))]
    NoRangeColumns {
        /// Columns the dataset does have.
        available: Vec<String>,
    },
    /// The input holds no digits to derive a key from.
    #[error("no serial number could be extracted from {input:?}")]
    UnextractableInput {
        /// The trimmed input.
        input: String,
    },
}

/// Column names carrying the lower and upper range bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeColumns {
    /// Lower-bound column.
    pub from: String,
    /// Upper-bound column.
    pub to: String,
}

impl RangeColumns {
    /// Resolve both range columns from the dataset header.
    pub fn resolve(dataset: &Dataset) -> Result<Self, LookupError> {
        let columns = || dataset.columns().iter().map(String::as_str);
        match (
            resolve_column(&RANGE_FROM, columns()),
            resolve_column(&RANGE_TO, columns()),
        ) {
            (Some(from), Some(to)) => Ok(Self {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(LookupError::NoRangeColumns {
                available: dataset.columns().to_vec(),
            }),
        }
    }
}

/// Outcome of a lookup that ran to completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult<'a> {
    /// At least one row's range contains the key.
    Found {
        /// Key extracted from the input.
        key: SerialKey,
        /// The first matching row in dataset order.
        row: &'a DatasetRow,
        /// Every match, first one included.
        all_matches: Vec<RangeMatch<'a>>,
    },
    /// No row's range contains the key.
    NotFound {
        /// Key extracted from the input.
        key: SerialKey,
    },
}

impl<'a> MatchResult<'a> {
    /// The key that was searched for.
    pub fn key(&self) -> SerialKey {
        match self {
            MatchResult::Found { key, .. } | MatchResult::NotFound { key } => *key,
        }
    }

    /// The row that drives the label, if any.
    pub fn row(&self) -> Option<&'a DatasetRow> {
        match self {
            MatchResult::Found { row, .. } => Some(row),
            MatchResult::NotFound { .. } => None,
        }
    }

    /// Number of matching rows.
    pub fn match_count(&self) -> usize {
        match self {
            MatchResult::Found { all_matches, .. } => all_matches.len(),
            MatchResult::NotFound { .. } => 0,
        }
    }
}

/// Look up `raw_input` in `dataset`.
pub fn lookup<'a>(dataset: &'a Dataset, raw_input: &str) -> Result<MatchResult<'a>, LookupError> {
    let input = raw_input.trim();
    if input.is_empty() {
        return Err(LookupError::EmptyInput);
    }
    let columns = RangeColumns::resolve(dataset)?;
    let key = extract_serial_key(input).ok_or_else(|| LookupError::UnextractableInput {
        input: input.to_string(),
    })?;

    let all_matches = find_matches(key, dataset.rows(), &columns.from, &columns.to);
    for m in &all_matches {
        debug!(row = m.index, from = %m.from, to = %m.to, %key, "serial range match");
    }
    let Some(first) = all_matches.first() else {
        return Ok(MatchResult::NotFound { key });
    };
    if all_matches.len() > 1 {
        warn!(
            %key,
            matches = all_matches.len(),
            "serial matches multiple ranges, using row {}",
            first.index
        );
    }
    let row = first.row;
    Ok(MatchResult::Found {
        key,
        row,
        all_matches,
    })
}
