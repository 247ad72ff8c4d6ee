//! Label layout model.
//!
//! A [`LayoutModel`] binds each [`FieldId`] to its on-label position and a
//! barcode flag. Positions come from [`LabelSettings`]; the barcode flags
//! are derived from the active [`Template`] alone, so switching templates
//! never moves a field. The model is a pure value rebuilt for every render.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serial_label_settings::{FieldPosition, LabelSettings, Slot, Template};
use tracing::{info, warn};

use crate::alias::TEMPLATE;
use crate::dataset::DatasetRow;
use crate::project::project_field;

/// Identity of one field on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    /// Product description (`P/D`).
    Description,
    /// Part number (`P/N`).
    PartNumber,
    /// Revision (`P/R`).
    Revision,
    /// Quantity (`QTY`), drawn in the revision slot.
    Quantity,
    /// Serial number (`S/N`).
    Serial,
}

impl FieldId {
    /// Every field in drawing order.
    pub const ALL: [FieldId; 5] = [
        FieldId::Description,
        FieldId::PartNumber,
        FieldId::Revision,
        FieldId::Quantity,
        FieldId::Serial,
    ];

    /// Caption printed in front of the value.
    pub fn caption(self) -> &'static str {
        match self {
            FieldId::Description => "P/D",
            FieldId::PartNumber => "P/N",
            FieldId::Revision => "P/R",
            FieldId::Quantity => "QTY",
            FieldId::Serial => "S/N",
        }
    }

    /// Settings slot that positions this field.
    pub fn slot(self) -> Slot {
        match self {
            FieldId::Description => Slot::Description,
            FieldId::PartNumber => Slot::PartNumber,
            FieldId::Revision | FieldId::Quantity => Slot::Revision,
            FieldId::Serial => Slot::Serial,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}

/// Fields shown by `template`, each mapped to whether it carries a barcode.
pub fn fields_for_template(template: Template) -> BTreeMap<FieldId, bool> {
    let entries: &[(FieldId, bool)] = match template {
        Template::WithBarcodes => &[
            (FieldId::Description, false),
            (FieldId::PartNumber, true),
            (FieldId::Revision, true),
            (FieldId::Serial, true),
        ],
        Template::TextOnly => &[
            (FieldId::Description, false),
            (FieldId::PartNumber, false),
            (FieldId::Quantity, false),
            (FieldId::Serial, false),
        ],
        Template::SerialBarcode => &[
            (FieldId::Description, false),
            (FieldId::PartNumber, false),
            (FieldId::Quantity, false),
            (FieldId::Serial, true),
        ],
    };
    entries.iter().copied().collect()
}

/// One named slot on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelField {
    /// Field identity.
    pub id: FieldId,
    /// Position in label coordinates.
    pub position: FieldPosition,
    /// Whether a barcode glyph accompanies the text under the current template.
    pub has_barcode: bool,
}

/// Field positions plus the active template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutModel {
    fields: BTreeMap<FieldId, LabelField>,
    template: Template,
}

impl LayoutModel {
    /// Build the model from settings and a template.
    pub fn new(settings: &LabelSettings, template: Template) -> Self {
        let fields = FieldId::ALL
            .into_iter()
            .map(|id| {
                let field = LabelField {
                    id,
                    position: settings.position(id.slot()),
                    has_barcode: false,
                };
                (id, field)
            })
            .collect();
        let mut model = Self {
            fields,
            template: Template::default(),
        };
        model.set_template(template);
        model
    }

    /// Switch template. Positions are untouched; only barcode flags change.
    pub fn set_template(&mut self, template: Template) {
        let flags = fields_for_template(template);
        for field in self.fields.values_mut() {
            field.has_barcode = flags.get(&field.id).copied().unwrap_or(false);
        }
        self.template = template;
    }

    /// Active template.
    pub fn template(&self) -> Template {
        self.template
    }

    /// Every field, shown or not.
    pub fn fields(&self) -> &BTreeMap<FieldId, LabelField> {
        &self.fields
    }

    /// A single field.
    pub fn field(&self, id: FieldId) -> &LabelField {
        &self.fields[&id]
    }

    /// Fields shown by the active template, in drawing order.
    pub fn active_fields(&self) -> impl Iterator<Item = &LabelField> {
        let shown = fields_for_template(self.template);
        self.fields
            .values()
            .filter(move |f| shown.contains_key(&f.id))
    }
}

/// Template for one label instance.
///
/// A valid id (1/2/3) in the row's template column overrides `selected`;
/// an absent, blank, or invalid value leaves `selected` in effect.
pub fn effective_template(selected: Template, row: Option<&DatasetRow>) -> Template {
    let Some(raw) = row.and_then(|r| project_field(r, &TEMPLATE)) else {
        return selected;
    };
    if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("nan") {
        return selected;
    }
    match Template::parse(&raw) {
        Some(t) => {
            info!(template = t.id(), "using template from dataset row");
            t
        }
        None => {
            warn!(value = %raw, "invalid template value in dataset row, keeping {selected}");
            selected
        }
    }
}
