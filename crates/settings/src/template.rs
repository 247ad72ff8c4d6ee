//! Label template identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which label fields carry a barcode glyph versus plain text.
///
/// Templates are persisted and read from datasets by their numeric id
/// (`1`, `2`, `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Template {
    /// Description is text-only; part number, revision, and serial each get
    /// a barcode with the text below it.
    #[default]
    WithBarcodes,
    /// Every field is text-only. A quantity field takes the revision slot.
    TextOnly,
    /// Description, part number, and quantity are text-only; the serial
    /// alone gets a barcode.
    SerialBarcode,
}

impl Template {
    /// All templates in id order.
    pub const ALL: [Template; 3] = [
        Template::WithBarcodes,
        Template::TextOnly,
        Template::SerialBarcode,
    ];

    /// Numeric id used in settings documents and datasets.
    pub fn id(self) -> u8 {
        match self {
            Template::WithBarcodes => 1,
            Template::TextOnly => 2,
            Template::SerialBarcode => 3,
        }
    }

    /// Look up a template by numeric id. Returns `None` outside `1..=3`.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Template::WithBarcodes),
            2 => Some(Template::TextOnly),
            3 => Some(Template::SerialBarcode),
            _ => None,
        }
    }

    /// Parse a template id from a dataset cell or CLI value.
    ///
    /// Surrounding whitespace is ignored. Integral float spellings such as
    /// `"2.0"` are accepted because spreadsheet exports write integer
    /// columns that way once any cell in the column is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<u8>() {
            return Self::from_id(id);
        }
        let value = raw.parse::<f64>().ok()?;
        if value.fract() != 0.0 || !(1.0..=3.0).contains(&value) {
            return None;
        }
        Self::from_id(value as u8)
    }

    /// Short human-readable description of the template.
    pub fn describe(self) -> &'static str {
        match self {
            Template::WithBarcodes => "P/D text, P/N barcode, P/R barcode, S/N barcode",
            Template::TextOnly => "P/D text, P/N text, QTY text, S/N text (no barcodes)",
            Template::SerialBarcode => "P/D text, P/N text, QTY text, S/N barcode",
        }
    }
}

impl TryFrom<u8> for Template {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Template::from_id(id).ok_or_else(|| format!("template must be 1, 2, or 3 (got {id})"))
    }
}

impl From<Template> for u8 {
    fn from(t: Template) -> Self {
        t.id()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for t in Template::ALL {
            assert_eq!(Template::from_id(t.id()), Some(t));
        }
        assert_eq!(Template::from_id(0), None);
        assert_eq!(Template::from_id(4), None);
    }

    #[test]
    fn parse_accepts_padded_and_float_ids() {
        assert_eq!(Template::parse(" 2 "), Some(Template::TextOnly));
        assert_eq!(Template::parse("3.0"), Some(Template::SerialBarcode));
        assert_eq!(Template::parse("1"), Some(Template::WithBarcodes));
    }

    #[test]
    fn parse_rejects_invalid_values() {
        assert_eq!(Template::parse(""), None);
        assert_eq!(Template::parse("4"), None);
        assert_eq!(Template::parse("2.5"), None);
        assert_eq!(Template::parse("two"), None);
        assert_eq!(Template::parse("-1"), None);
        assert_eq!(Template::parse("NaN"), None);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Template::SerialBarcode).unwrap(), "3");
        let t: Template = serde_json::from_str("2").unwrap();
        assert_eq!(t, Template::TextOnly);
        assert!(serde_json::from_str::<Template>("7").is_err());
    }
}
