//! Label content and the render-boundary projection.
//!
//! [`LabelContent`] holds the display string for every field of one label.
//! [`RenderRequest`] combines content with a [`LayoutModel`] into the plain
//! data a renderer consumes: one [`RenderField`] per shown field with its
//! caption, text, position, and barcode flag.

use std::collections::BTreeMap;

use serde::Serialize;
use serial_label_settings::{FieldPosition, LabelSettings, Template};

use crate::alias::{DESCRIPTION, PART_NUMBER, QUANTITY, REVISION};
use crate::dataset::DatasetRow;
use crate::layout::{FieldId, LayoutModel, effective_template};
use crate::project::project;

/// Description used when the row has none.
pub const DEFAULT_DESCRIPTION: &str = "SCB CCA";
/// Part number used when the row has none.
pub const DEFAULT_PART_NUMBER: &str = "CZ5S1000B";
/// Revision used when the row has none.
pub const DEFAULT_REVISION: &str = "02";
/// Quantity used when the row has none.
pub const DEFAULT_QUANTITY: &str = "1";
/// Serial shown on preview labels.
pub const SAMPLE_SERIAL: &str = "CDL2349-1195";

/// Display text for every field of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelContent {
    values: BTreeMap<FieldId, String>,
}

impl LabelContent {
    /// Content for a matched row and the serial that was looked up.
    ///
    /// Fields the row does not provide (or provides blank) take their
    /// defaults. The serial is printed exactly as entered, trimmed.
    pub fn from_match(row: &DatasetRow, serial: &str) -> Self {
        let projected = project(
            row,
            [
                (FieldId::Description, &*DESCRIPTION),
                (FieldId::PartNumber, &*PART_NUMBER),
                (FieldId::Revision, &*REVISION),
                (FieldId::Quantity, &*QUANTITY),
            ],
        );
        let pick = |id: FieldId, default: &str| {
            projected
                .get(&id)
                .filter(|v| !is_blank(v))
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        let mut values = BTreeMap::new();
        values.insert(FieldId::Description, pick(FieldId::Description, DEFAULT_DESCRIPTION));
        values.insert(FieldId::PartNumber, pick(FieldId::PartNumber, DEFAULT_PART_NUMBER));
        values.insert(FieldId::Revision, pick(FieldId::Revision, DEFAULT_REVISION));
        values.insert(FieldId::Quantity, pick(FieldId::Quantity, DEFAULT_QUANTITY));
        values.insert(FieldId::Serial, serial.trim().to_string());
        Self { values }
    }

    /// Preview content shown before any lookup.
    pub fn sample() -> Self {
        let values = [
            (FieldId::Description, DEFAULT_DESCRIPTION),
            (FieldId::PartNumber, DEFAULT_PART_NUMBER),
            (FieldId::Revision, DEFAULT_REVISION),
            (FieldId::Quantity, DEFAULT_QUANTITY),
            (FieldId::Serial, SAMPLE_SERIAL),
        ]
        .into_iter()
        .map(|(id, v)| (id, v.to_string()))
        .collect();
        Self { values }
    }

    /// Text for a field.
    pub fn get(&self, id: FieldId) -> &str {
        self.values.get(&id).map_or("", String::as_str)
    }

    /// Replace the text of one field.
    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }
}

fn is_blank(v: &str) -> bool {
    let v = v.trim();
    v.is_empty() || v.eq_ignore_ascii_case("nan")
}

/// Template for a label built from `row`.
///
/// The row's `Template` column wins when it holds a valid id; otherwise the
/// template from settings applies.
pub fn resolve_template(settings_template: Template, row: Option<&DatasetRow>) -> Template {
    effective_template(settings_template, row)
}

/// One field as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderField {
    /// Field identity.
    pub id: FieldId,
    /// Caption printed at `position` (`P/N`, `QTY`, ...).
    pub caption: &'static str,
    /// Value text.
    pub text: String,
    /// Caption anchor in label coordinates.
    pub position: FieldPosition,
    /// Whether a barcode glyph accompanies the text.
    pub has_barcode: bool,
}

/// Everything a renderer needs for one label.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest<'s> {
    /// Global canvas, logo, barcode box, and font settings.
    pub settings: &'s LabelSettings,
    /// Template the fields were derived from.
    pub template: Template,
    /// Shown fields in drawing order.
    pub fields: Vec<RenderField>,
}

impl<'s> RenderRequest<'s> {
    /// Project `content` through the layout `settings` and `template` define.
    pub fn build(settings: &'s LabelSettings, content: &LabelContent, template: Template) -> Self {
        let layout = LayoutModel::new(settings, template);
        let fields = layout
            .active_fields()
            .map(|f| RenderField {
                id: f.id,
                caption: f.id.caption(),
                text: content.get(f.id).to_string(),
                position: f.position,
                has_barcode: f.has_barcode,
            })
            .collect();
        Self {
            settings,
            template: layout.template(),
            fields,
        }
    }

    /// Field by identity, if the template shows it.
    pub fn field(&self, id: FieldId) -> Option<&RenderField> {
        self.fields.iter().find(|f| f.id == id)
    }
}
