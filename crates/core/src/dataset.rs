//! Tabular dataset model and loaders.
//!
//! Rows are immutable snapshots taken at load time. The core never mutates
//! them; a reload replaces the whole [`Dataset`].

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// The file could not be opened or read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV input is malformed.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON input is malformed or not an array of objects.
    #[error("invalid JSON dataset: {0}")]
    Json(String),

    /// The file extension is not a supported dataset format.
    #[error("unsupported dataset format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        DatasetError::Json(e.to_string())
    }
}

/// One cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Textual value, stored exactly as read.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Blank or missing value.
    Empty,
}

impl Cell {
    /// `true` for [`Cell::Empty`], blank text, and the `nan` marker that
    /// spreadsheet exports write for missing numbers.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.eq_ignore_ascii_case("nan")
            }
            Cell::Number(n) => n.is_nan(),
        }
    }

    /// Build a cell from raw text; blank text becomes [`Cell::Empty`].
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // f64's Display already drops the fractional part for integral values.
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Empty => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// An ordered mapping from column name to cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetRow {
    cells: Vec<(String, Cell)>,
}

impl DatasetRow {
    /// Build a row from `(column, cell)` pairs in column order.
    pub fn new<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Cell>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell for an exact column name.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// `(column, cell)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for DatasetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A loaded table: header plus rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Build a dataset from a header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<DatasetRow>) -> Self {
        Self { columns, rows }
    }

    /// Header column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a CSV table. The first record is the header; short records are
    /// padded with [`Cell::Empty`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let cells = columns.iter().enumerate().map(|(i, col)| {
                let cell = record.get(i).map_or(Cell::Empty, Cell::from_text);
                (col.clone(), cell)
            });
            rows.push(DatasetRow::new(cells));
        }
        Ok(Self { columns, rows })
    }

    /// Parse a JSON array of flat objects.
    ///
    /// Strings become [`Cell::Text`], numbers [`Cell::Number`], `null`
    /// [`Cell::Empty`]; booleans and nested values are kept as their JSON
    /// text. Columns are ordered by first appearance across rows, and a row
    /// missing a column gets [`Cell::Empty`] for it.
    pub fn from_json_str(s: &str) -> Result<Self, DatasetError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        let serde_json::Value::Array(items) = value else {
            return Err(DatasetError::Json("expected a top-level array of objects".into()));
        };

        let mut objects = Vec::with_capacity(items.len());
        let mut columns: Vec<String> = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            let serde_json::Value::Object(map) = item else {
                return Err(DatasetError::Json(format!("row {i} is not an object")));
            };
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            objects.push(map);
        }

        let rows = objects
            .into_iter()
            .map(|map| {
                DatasetRow::new(columns.iter().map(|col| {
                    let cell = map.get(col).map_or(Cell::Empty, json_cell);
                    (col.clone(), cell)
                }))
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Load a dataset from disk, choosing the format by file extension.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let io_err = |source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        };
        match ext.as_str() {
            "csv" => {
                let file = fs::File::open(path).map_err(io_err)?;
                Self::from_csv_reader(file)
            }
            "json" => {
                let text = fs::read_to_string(path).map_err(io_err)?;
                Self::from_json_str(&text)
            }
            other => Err(DatasetError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn json_cell(v: &serde_json::Value) -> Cell {
    match v {
        serde_json::Value::Null => Cell::Empty,
        serde_json::Value::String(s) => Cell::from_text(s),
        serde_json::Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::Number),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_header_and_rows() {
        let csv = "SL.From,SL.End,P/N\n100,200,CZ5S1000B\n300,,X\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.columns(), ["SL.From", "SL.End", "P/N"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].get("P/N"), Some(&Cell::Text("CZ5S1000B".into())));
        assert_eq!(ds.rows()[1].get("SL.End"), Some(&Cell::Empty));
    }

    #[test]
    fn csv_short_record_padded() {
        let csv = "A,B,C\n1\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        let row = &ds.rows()[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("C"), Some(&Cell::Empty));
    }

    #[test]
    fn csv_headers_trimmed() {
        let csv = " SL From , SL End \n1,2\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.columns(), ["SL From", "SL End"]);
    }

    #[test]
    fn json_rows_keep_first_seen_column_order() {
        let json = r#"[
            { "SL.From": "100", "SL.End": 200, "P/R": "02" },
            { "SL.From": null, "Extra": true }
        ]"#;
        let ds = Dataset::from_json_str(json).unwrap();
        assert_eq!(ds.columns(), ["SL.From", "SL.End", "P/R", "Extra"]);
        let first = &ds.rows()[0];
        assert_eq!(first.get("SL.End"), Some(&Cell::Number(200.0)));
        assert_eq!(first.get("Extra"), Some(&Cell::Empty));
        let second = &ds.rows()[1];
        assert_eq!(second.get("SL.From"), Some(&Cell::Empty));
        assert_eq!(second.get("Extra"), Some(&Cell::Text("true".into())));
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(
            Dataset::from_json_str(r#"{ "a": 1 }"#),
            Err(DatasetError::Json(_))
        ));
        assert!(matches!(
            Dataset::from_json_str("[1, 2]"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn emptiness_rules() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::Text("  ".into()).is_empty());
        assert!(Cell::Text("NaN".into()).is_empty());
        assert!(Cell::Number(f64::NAN).is_empty());
        assert!(!Cell::Text("0".into()).is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(Cell::Number(200.0).to_string(), "200");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            Dataset::load_path("serials.xlsx"),
            Err(DatasetError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn row_serializes_as_map() {
        let row = DatasetRow::new([("A", Cell::from("x")), ("B", Cell::Empty)]);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"A":"x","B":null}"#);
    }
}
