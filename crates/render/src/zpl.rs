//! ZPL II label renderer.
//!
//! Produces a print-ready `^XA ... ^XZ` document from a render request.
//! One layout pixel maps to one printer dot. Text uses the printer's
//! scalable font `0`; barcodes are Code 128 symbols generated by the
//! printer itself, so the encoder capability is not consulted here.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use image::GrayImage;
use serial_label_core::{LabelSettings, RenderField, RenderRequest};
use tracing::debug;

use crate::assets::RenderAssets;
use crate::raster::{BARCODE_TEXT_GAP, BARCODE_TOP, VALUE_OFFSET};
use crate::report::RenderReport;

/// A rendered ZPL document plus what degraded while building it.
#[derive(Debug, Clone)]
pub struct ZplLabel {
    document: String,
    report: RenderReport,
}

impl ZplLabel {
    /// The ZPL source.
    pub fn as_str(&self) -> &str {
        &self.document
    }

    /// Per-field outcomes.
    pub fn report(&self) -> &RenderReport {
        &self.report
    }

    /// Take the ZPL source.
    pub fn into_string(self) -> String {
        self.document
    }

    /// Write the ZPL source to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, &self.document)
    }
}

/// Render `request` as a ZPL II document.
pub fn render_zpl(request: &RenderRequest<'_>, assets: &RenderAssets) -> ZplLabel {
    let settings = request.settings;
    let mut report = RenderReport::new();
    let mut out = String::new();

    out.push_str("^XA\n^CI28\n");
    let _ = writeln!(out, "^PW{}", settings.width);
    let _ = writeln!(out, "^LL{}", settings.height);
    let _ = writeln!(out, "^FO0,0^GB{},{},1^FS", settings.width, settings.height);

    match &assets.logo {
        Some(logo) => {
            let resized = image::imageops::resize(
                logo,
                settings.logo_width.max(1),
                settings.logo_height.max(1),
                image::imageops::FilterType::Lanczos3,
            );
            let _ = writeln!(
                out,
                "^FO{},{}{}^FS",
                settings.logo_x,
                settings.logo_y,
                graphic_field(&resized)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "^FO{},{}^A0N,{size},{size}^FH^FD{}^FS",
                settings.logo_x,
                settings.logo_y,
                escape_field_data(&settings.company_text),
                size = settings.font_company_size,
            );
        }
    }

    for field in &request.fields {
        write_field(&mut out, &mut report, settings, field);
    }
    out.push_str("^XZ\n");

    debug!(
        template = request.template.id(),
        bytes = out.len(),
        "rendered ZPL label"
    );
    ZplLabel {
        document: out,
        report,
    }
}

fn write_field(out: &mut String, report: &mut RenderReport, settings: &LabelSettings, field: &RenderField) {
    let (x, y) = (field.position.x, field.position.y);
    let value_x = x + VALUE_OFFSET;
    let _ = writeln!(
        out,
        "^FO{x},{y}^A0N,{size},{size}^FD{}^FS",
        field.caption,
        size = settings.font_label_size,
    );

    let text_y = if field.has_barcode {
        let top = y + BARCODE_TOP;
        let (bw, bh) = (settings.barcode_width, settings.barcode_height);
        match code128_problem(&field.text) {
            None => {
                let _ = writeln!(
                    out,
                    "^FO{value_x},{top}^BY1^BCN,{bh},N,N,N^FH^FD{}^FS",
                    escape_field_data(&code128_data(&field.text))
                );
            }
            Some(reason) => {
                let _ = writeln!(out, "^FO{value_x},{top}^GB{bw},{bh},1^FS");
                report.degraded(field.id, format!("barcode: {reason}"));
            }
        }
        y + i32::try_from(bh).unwrap_or(i32::MAX) + BARCODE_TEXT_GAP
    } else {
        y
    };

    let _ = writeln!(
        out,
        "^FO{value_x},{text_y}^A0N,{size},{size}^FH^FD{}^FS",
        escape_field_data(&field.text),
        size = settings.font_data_size,
    );
    report.rendered(field.id);
}

fn code128_problem(data: &str) -> Option<&'static str> {
    if data.is_empty() {
        Some("data is empty")
    } else if !data.is_ascii() {
        Some("Code 128 cannot carry non-ASCII data")
    } else {
        None
    }
}

/// `>` opens an invocation code inside `^BC` data; `><` prints a literal `>`.
fn code128_data(data: &str) -> String {
    data.replace('>', "><")
}

/// Escape field data for use after `^FH`: the `^`, `~`, and `_` bytes become
/// `_XX` hex escapes so they cannot be read as commands or escapes.
pub fn escape_field_data(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for ch in data.chars() {
        match ch {
            '^' | '~' | '_' => {
                let _ = write!(out, "_{:02X}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Encode a bitmap as an ASCII-hex `^GFA` graphic field.
///
/// Pixels darker than mid-grey are printed. Rows are packed MSB first and
/// padded to whole bytes.
pub fn graphic_field(img: &GrayImage) -> String {
    let (width, height) = img.dimensions();
    let bytes_per_row = width.div_ceil(8) as usize;
    let total = bytes_per_row * height as usize;

    let mut hex = String::with_capacity(total * 2);
    for row in 0..height {
        let mut byte = 0u8;
        let mut bits = 0;
        for col in 0..width {
            byte = (byte << 1) | u8::from(img.get_pixel(col, row)[0] < 128);
            bits += 1;
            if bits == 8 {
                let _ = write!(hex, "{byte:02X}");
                byte = 0;
                bits = 0;
            }
        }
        if bits != 0 {
            byte <<= 8 - bits;
            let _ = write!(hex, "{byte:02X}");
        }
    }
    format!("^GFA,{total},{total},{bytes_per_row},{hex}")
}
