//! Per-field render outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serial_label_core::FieldId;
use tracing::warn;

/// What happened to one part of the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// Drawn as requested.
    Rendered,
    /// Drawn with a visible stand-in, or partly missing.
    Degraded {
        /// Human-readable cause.
        reason: String,
    },
}

impl FieldOutcome {
    /// `true` for [`FieldOutcome::Rendered`].
    pub fn is_rendered(&self) -> bool {
        matches!(self, FieldOutcome::Rendered)
    }
}

impl fmt::Display for FieldOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOutcome::Rendered => f.write_str("rendered"),
            FieldOutcome::Degraded { reason } => write!(f, "degraded: {reason}"),
        }
    }
}

/// Outcome of every part a renderer drew.
///
/// A part keeps its first degradation; later successes never mask it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    logo: FieldOutcome,
    fields: BTreeMap<FieldId, FieldOutcome>,
}

impl Default for RenderReport {
    fn default() -> Self {
        Self {
            logo: FieldOutcome::Rendered,
            fields: BTreeMap::new(),
        }
    }
}

impl RenderReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a field as drawn, unless it already degraded.
    pub fn rendered(&mut self, id: FieldId) {
        self.fields.entry(id).or_insert(FieldOutcome::Rendered);
    }

    /// Mark a field as degraded.
    pub fn degraded(&mut self, id: FieldId, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(field = %id, %reason, "label field degraded");
        let slot = self.fields.entry(id).or_insert(FieldOutcome::Rendered);
        if slot.is_rendered() {
            *slot = FieldOutcome::Degraded { reason };
        }
    }

    /// Mark the logo area as degraded.
    pub fn logo_degraded(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "label logo degraded");
        if self.logo.is_rendered() {
            self.logo = FieldOutcome::Degraded { reason };
        }
    }

    /// Logo outcome.
    pub fn logo(&self) -> &FieldOutcome {
        &self.logo
    }

    /// Outcome of one field, if it was drawn at all.
    pub fn field(&self, id: FieldId) -> Option<&FieldOutcome> {
        self.fields.get(&id)
    }

    /// Every drawn field and its outcome.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldOutcome)> {
        self.fields.iter().map(|(id, o)| (*id, o))
    }

    /// `true` when nothing degraded.
    pub fn is_complete(&self) -> bool {
        self.logo.is_rendered() && self.fields.values().all(FieldOutcome::is_rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_degradation_sticks() {
        let mut report = RenderReport::new();
        report.degraded(FieldId::Serial, "barcode failed");
        report.rendered(FieldId::Serial);
        report.degraded(FieldId::Serial, "second");
        assert_eq!(
            report.field(FieldId::Serial),
            Some(&FieldOutcome::Degraded {
                reason: "barcode failed".into()
            })
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn complete_when_everything_rendered() {
        let mut report = RenderReport::new();
        report.rendered(FieldId::Description);
        report.rendered(FieldId::PartNumber);
        assert!(report.is_complete());
        report.logo_degraded("no font");
        assert!(!report.is_complete());
    }
}
