//! Column-name alias groups and column resolution.
//!
//! Spreadsheet headers drift (`SL.From`, `Serial From`, `sl.from_code`), so
//! each logical column is described by an ordered [`AliasGroup`] and
//! resolved by case-insensitive substring match. Alias order decides
//! priority: the first alias that matches any column wins, regardless of
//! where that column sits in the table.

use std::sync::LazyLock;

use serde::Serialize;

/// Ordered list of acceptable column-name substrings for one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasGroup {
    aliases: Vec<String>,
    #[serde(skip)]
    folded: Vec<String>,
}

impl AliasGroup {
    /// Build a group from aliases in priority order.
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        let folded = aliases.iter().map(|a| a.to_uppercase()).collect();
        Self { aliases, folded }
    }

    /// Aliases in priority order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Does the alias at `index` occur in `column`?
    pub(crate) fn alias_matches(&self, index: usize, folded_column: &str) -> bool {
        self.folded
            .get(index)
            .is_some_and(|a| folded_column.contains(a.as_str()))
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// `true` when the group has no aliases (and so never matches).
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Resolve a logical column against the available column names.
///
/// For each alias in order, scans every column and returns the first column
/// whose name contains the alias, ignoring case. Returns `None` when no
/// alias matches any column.
///
/// ```
/// use serial_label_core::{AliasGroup, resolve_column};
/// let group = AliasGroup::new(["SL.From", "SL From"]);
/// assert_eq!(resolve_column(&group, ["sl.from_code"]), Some("sl.from_code"));
/// ```
pub fn resolve_column<'c, I>(group: &AliasGroup, columns: I) -> Option<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    let columns: Vec<(&str, String)> = columns
        .into_iter()
        .map(|c| (c, c.to_uppercase()))
        .collect();
    (0..group.len()).find_map(|i| {
        columns
            .iter()
            .find(|(_, folded)| group.alias_matches(i, folded))
            .map(|(c, _)| *c)
    })
}

/// Serial range start column.
pub static RANGE_FROM: LazyLock<AliasGroup> =
    LazyLock::new(|| AliasGroup::new(["SL.From", "SL From", "SL_From", "Serial From", "From"]));

/// Serial range end column.
pub static RANGE_TO: LazyLock<AliasGroup> = LazyLock::new(|| {
    AliasGroup::new(["SL.End", "SL End", "SL_End", "Serial End", "End", "To"])
});

/// Product description column.
pub static DESCRIPTION: LazyLock<AliasGroup> =
    LazyLock::new(|| AliasGroup::new(["P/D", "PD", "DESCRIPTION", "DESC", "PRODUCT"]));

/// Part number column.
pub static PART_NUMBER: LazyLock<AliasGroup> =
    LazyLock::new(|| AliasGroup::new(["P/N", "PN", "PART", "CPN", "PART_NUMBER"]));

/// Revision column.
pub static REVISION: LazyLock<AliasGroup> =
    LazyLock::new(|| AliasGroup::new(["P/R", "PR", "REVISION", "REV", "VERSION"]));

/// Quantity column.
pub static QUANTITY: LazyLock<AliasGroup> = LazyLock::new(|| AliasGroup::new(["QTY", "QUANTITY"]));

/// Per-row template override column.
pub static TEMPLATE: LazyLock<AliasGroup> = LazyLock::new(|| AliasGroup::new(["Template"]));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_ignores_case() {
        let group = AliasGroup::new(["SL.From", "SL From"]);
        assert_eq!(
            resolve_column(&group, ["sl.from_code"]),
            Some("sl.from_code")
        );
    }

    #[test]
    fn alias_order_beats_column_order() {
        let group = AliasGroup::new(["Serial From", "From"]);
        let columns = ["From Date", "Serial From"];
        assert_eq!(resolve_column(&group, columns), Some("Serial From"));
    }

    #[test]
    fn first_matching_column_for_one_alias() {
        let group = AliasGroup::new(["From"]);
        let columns = ["SL From", "Serial From"];
        assert_eq!(resolve_column(&group, columns), Some("SL From"));
    }

    #[test]
    fn no_match_is_none() {
        let group = AliasGroup::new(["SL.From"]);
        assert_eq!(resolve_column(&group, ["Part", "Rev"]), None);
        assert_eq!(resolve_column(&AliasGroup::new(Vec::<String>::new()), ["Part"]), None);
        assert_eq!(resolve_column(&group, Vec::<&str>::new()), None);
    }

    #[test]
    fn standard_range_groups() {
        let columns = ["S.No", "SL.From", "SL.End", "P/N"];
        assert_eq!(resolve_column(&RANGE_FROM, columns), Some("SL.From"));
        assert_eq!(resolve_column(&RANGE_TO, columns), Some("SL.End"));
    }
}
