//! Serial-label lookup and layout engine.
//!
//! Resolves a scanned or typed serial number against a dataset of serial
//! ranges and turns the matching row into a label description. The main
//! entry points are [`lookup`] for matching, [`LabelContent::from_match`]
//! for field projection, and [`RenderRequest::build`] for the structure a
//! renderer consumes.

#![warn(missing_docs)]

/// Column alias groups and header resolution.
pub mod alias;
/// Tabular dataset model and CSV/JSON loaders.
pub mod dataset;
/// Label content and render requests.
pub mod label;
/// Field identities, template rules, and the layout model.
pub mod layout;
/// One-shot serial lookups against a dataset.
pub mod lookup;
/// Field projection out of dataset rows.
pub mod project;
/// Inclusive serial-range matching.
pub mod range;
/// Serial-number key extraction.
pub mod serial;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Serial extractor
pub use serial::{SerialKey, extract_serial_key};

// Column resolver
pub use alias::{AliasGroup, resolve_column};

// Dataset
pub use dataset::{Cell, Dataset, DatasetError, DatasetRow};

// Range matcher
pub use range::{RangeMatch, find_matches, range_bounds};

// Field projector
pub use project::{project, project_field};

// Layout model
pub use layout::{FieldId, LabelField, LayoutModel, effective_template, fields_for_template};

// Lookup session
pub use lookup::{LookupError, MatchResult, RangeColumns, lookup};

// Label content
pub use label::{LabelContent, RenderField, RenderRequest, resolve_template};

// Settings (re-exported from the settings crate)
pub use serial_label_settings::{FieldPosition, LabelSettings, Slot, Template};
