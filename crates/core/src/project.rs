//! Field projection: pull display strings for logical fields out of a row.

use std::collections::BTreeMap;

use crate::alias::AliasGroup;
use crate::dataset::{Cell, DatasetRow};

/// Value of the first column matching any alias of `group`.
///
/// Aliases are the outer loop and columns the inner loop, so alias priority
/// beats column order. The cell is stringified as-is (an empty cell yields
/// an empty string).
pub fn project_field(row: &DatasetRow, group: &AliasGroup) -> Option<String> {
    let folded: Vec<(String, &Cell)> = row
        .iter()
        .map(|(col, cell)| (col.to_uppercase(), cell))
        .collect();
    (0..group.len()).find_map(|i| {
        folded
            .iter()
            .find(|(col, _)| group.alias_matches(i, col))
            .map(|(_, cell)| cell.to_string())
    })
}

/// Project every logical field of `groups` out of `row`.
///
/// Fields with no matching column are absent from the result; callers
/// apply their own defaults.
pub fn project<'g, K, I>(row: &DatasetRow, groups: I) -> BTreeMap<K, String>
where
    K: Ord,
    I: IntoIterator<Item = (K, &'g AliasGroup)>,
{
    groups
        .into_iter()
        .filter_map(|(key, group)| project_field(row, group).map(|v| (key, v)))
        .collect()
}
