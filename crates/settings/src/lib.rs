//! Label settings for serial-label.
//!
//! A [`LabelSettings`] document carries everything the layout and
//! rendering stages need: canvas size, per-field positions, logo geometry,
//! barcode box size, font sizes, and the active [`Template`]. Settings are
//! persisted as a flat JSON object. Loading merges the persisted keys over
//! the compiled-in defaults: missing keys keep their default value and
//! unknown keys are ignored.

mod template;

pub use template::Template;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixels per millimetre used by the default layout (72 dpi points).
pub const PX_PER_MM: f64 = 2.834;

/// Convert millimetres to layout pixels, rounded to the nearest pixel.
pub fn mm_to_px(mm: f64) -> i32 {
    (mm * PX_PER_MM).round() as i32
}

/// Convert layout pixels to millimetres.
pub fn px_to_mm(px: i32) -> f64 {
    f64::from(px) / PX_PER_MM
}

/// Errors that can occur when loading, validating, or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// JSON deserialization failed.
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The settings file exists but could not be read or written.
    #[error("settings file {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// A point in label coordinate space (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldPosition {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl FieldPosition {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A positioned slot on the label. Each slot has its own `*_x`/`*_y` pair
/// in the settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Product description row (`pd_x`, `pd_y`).
    Description,
    /// Part number row (`pn_x`, `pn_y`).
    PartNumber,
    /// Revision row (`pr_x`, `pr_y`); also hosts quantity.
    Revision,
    /// Serial number row (`sn_x`, `sn_y`).
    Serial,
}

/// The full label configuration bundle.
///
/// Every field has a compiled-in default (see [`LabelSettings::default`]),
/// so any subset of keys is a valid settings document.
///
/// # Example
/// ```
/// let settings = serial_label_settings::load_settings_from_str(r#"{ "template": 3, "sn_y": 120 }"#).unwrap();
/// assert_eq!(settings.template, serial_label_settings::Template::SerialBarcode);
/// assert_eq!(settings.sn_y, 120);
/// assert_eq!(settings.width, 490);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Path to a logo image; `None` draws [`company_text`](Self::company_text) instead.
    pub logo_path: Option<String>,
    /// Logo left edge.
    pub logo_x: i32,
    /// Logo top edge.
    pub logo_y: i32,
    /// Logo box width.
    pub logo_width: u32,
    /// Logo box height.
    pub logo_height: u32,
    /// Company mark drawn when no logo image is available.
    pub company_text: String,
    /// Description row x.
    pub pd_x: i32,
    /// Description row y.
    pub pd_y: i32,
    /// Part number row x.
    pub pn_x: i32,
    /// Part number row y.
    pub pn_y: i32,
    /// Revision / quantity row x.
    pub pr_x: i32,
    /// Revision / quantity row y.
    pub pr_y: i32,
    /// Serial row x.
    pub sn_x: i32,
    /// Serial row y.
    pub sn_y: i32,
    /// Barcode glyph box width.
    pub barcode_width: u32,
    /// Barcode glyph box height.
    pub barcode_height: u32,
    /// Company mark font size.
    pub font_company_size: u32,
    /// Caption font size (`P/D`, `P/N`, ...).
    pub font_label_size: u32,
    /// Field value font size.
    pub font_data_size: u32,
    /// Secondary company mark font size.
    pub font_dlm_size: u32,
    /// TrueType font used by the raster renderer.
    pub font_path: Option<String>,
    /// Active template when the matched row does not override it.
    pub template: Template,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            width: 490,
            height: 170,
            logo_path: None,
            logo_x: 14,
            logo_y: 6,
            logo_width: 99,
            logo_height: 48,
            company_text: "CYIENT DLM".into(),
            pd_x: 127,
            pd_y: 17,
            pn_x: 127,
            pn_y: 40,
            pr_x: 127,
            pr_y: 82,
            sn_x: 127,
            sn_y: 130,
            barcode_width: 255,
            barcode_height: 23,
            font_company_size: 14,
            font_label_size: 10,
            font_data_size: 9,
            font_dlm_size: 8,
            font_path: None,
            template: Template::WithBarcodes,
        }
    }
}

impl LabelSettings {
    /// Position of a slot.
    pub fn position(&self, slot: Slot) -> FieldPosition {
        match slot {
            Slot::Description => FieldPosition::new(self.pd_x, self.pd_y),
            Slot::PartNumber => FieldPosition::new(self.pn_x, self.pn_y),
            Slot::Revision => FieldPosition::new(self.pr_x, self.pr_y),
            Slot::Serial => FieldPosition::new(self.sn_x, self.sn_y),
        }
    }

    /// Move a slot. Other slots are untouched.
    pub fn set_position(&mut self, slot: Slot, pos: FieldPosition) {
        let (x, y) = match slot {
            Slot::Description => (&mut self.pd_x, &mut self.pd_y),
            Slot::PartNumber => (&mut self.pn_x, &mut self.pn_y),
            Slot::Revision => (&mut self.pr_x, &mut self.pr_y),
            Slot::Serial => (&mut self.sn_x, &mut self.sn_y),
        };
        *x = pos.x;
        *y = pos.y;
    }

    /// Pretty-printed JSON document for persisting.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("settings serialization cannot fail")
    }

    /// Check structural invariants.
    ///
    /// - `width`, `height` must be > 0
    /// - `barcode_width`, `barcode_height` must be > 0
    /// - `logo_width`, `logo_height` must be > 0
    /// - every font size must be > 0
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("barcode_width", self.barcode_width),
            ("barcode_height", self.barcode_height),
            ("logo_width", self.logo_width),
            ("logo_height", self.logo_height),
            ("font_company_size", self.font_company_size),
            ("font_label_size", self.font_label_size),
            ("font_data_size", self.font_data_size),
            ("font_dlm_size", self.font_dlm_size),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(SettingsError::InvalidField {
                    field: field.into(),
                    reason: "must be > 0".into(),
                });
            }
        }
        Ok(())
    }
}

/// Load and validate [`LabelSettings`] from a JSON string.
///
/// The document must be a JSON object. Keys present in the document
/// override the defaults; missing keys fall back to
/// [`LabelSettings::default`]; unknown keys are ignored. `null` is accepted
/// for the optional path keys only.
pub fn load_settings_from_str(s: &str) -> Result<LabelSettings, SettingsError> {
    let settings: LabelSettings = serde_json::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// A persisted key that could not be applied during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedKey {
    /// The settings key.
    pub key: String,
    /// Why its value was refused.
    pub reason: String,
}

/// Result of a key-by-key merge: the settings plus every key left at its
/// previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSettings {
    /// Defaults with every acceptable persisted key applied.
    pub settings: LabelSettings,
    /// Keys whose values were wrongly typed or out of range.
    pub rejected: Vec<RejectedKey>,
}

/// Merge a JSON settings object over the defaults one key at a time.
///
/// Unlike [`load_settings_from_str`], a wrongly typed or invalid value only
/// costs its own key: that key keeps its default and is listed in
/// [`MergedSettings::rejected`]. Unknown keys are ignored. A document that
/// is not a JSON object is still an error.
pub fn merge_settings_from_str(s: &str) -> Result<MergedSettings, SettingsError> {
    let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(s)?;
    let mut settings = LabelSettings::default();
    let mut rejected = Vec::new();
    for (key, value) in document {
        let mut candidate = serde_json::to_value(&settings)?;
        let Some(slot) = candidate.get_mut(key.as_str()) else {
            continue;
        };
        *slot = value;
        let applied = serde_json::from_value::<LabelSettings>(candidate)
            .map_err(SettingsError::from)
            .and_then(|next| next.validate().map(|()| next));
        match applied {
            Ok(next) => settings = next,
            Err(e) => rejected.push(RejectedKey {
                key,
                reason: e.to_string(),
            }),
        }
    }
    Ok(MergedSettings { settings, rejected })
}

fn read_settings_text(path: &Path) -> Result<Option<String>, SettingsError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SettingsError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Load settings from a file.
///
/// A missing file is not an error: the compiled-in defaults are returned.
pub fn load_settings_file(path: impl AsRef<Path>) -> Result<LabelSettings, SettingsError> {
    match read_settings_text(path.as_ref())? {
        Some(text) => load_settings_from_str(&text),
        None => Ok(LabelSettings::default()),
    }
}

/// Merge a settings file over the defaults key by key (see
/// [`merge_settings_from_str`]). A missing file yields the defaults.
pub fn merge_settings_file(path: impl AsRef<Path>) -> Result<MergedSettings, SettingsError> {
    match read_settings_text(path.as_ref())? {
        Some(text) => merge_settings_from_str(&text),
        None => Ok(MergedSettings {
            settings: LabelSettings::default(),
            rejected: Vec::new(),
        }),
    }
}

/// Validate and write the whole settings document to `path`.
pub fn save_settings_file(
    settings: &LabelSettings,
    path: impl AsRef<Path>,
) -> Result<(), SettingsError> {
    settings.validate()?;
    let path = path.as_ref();
    fs::write(path, settings.to_json_pretty() + "\n").map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
