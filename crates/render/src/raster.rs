//! Raster (bitmap) label renderer.
//!
//! One loop over the request's fields draws every template: caption at the
//! field position, value column [`VALUE_OFFSET`] px to the right, and, for
//! barcode fields, the glyph at the top of the value column with the text
//! underneath it.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat, Luma};
use serial_label_core::{LabelSettings, RenderField, RenderRequest};
use thiserror::Error;
use tracing::debug;

use crate::assets::RenderAssets;
use crate::barcode::BarcodeEncoder;
use crate::report::RenderReport;
use crate::text::{draw_outline, draw_placeholder, draw_text};

/// Horizontal distance from a caption to its value column.
pub const VALUE_OFFSET: i32 = 30;
/// Vertical offset of a barcode glyph below the caption baseline box.
pub const BARCODE_TOP: i32 = 2;
/// Gap between a barcode glyph and the text printed beneath it.
pub const BARCODE_TEXT_GAP: i32 = 5;

/// Errors writing a rendered label.
#[derive(Debug, Error)]
pub enum RasterError {
    /// PNG encoding or file write failed.
    #[error("failed to write PNG: {0}")]
    Write(#[from] image::ImageError),
}

/// A rendered bitmap plus what degraded while drawing it.
#[derive(Debug, Clone)]
pub struct RasterLabel {
    image: GrayImage,
    report: RenderReport,
}

impl RasterLabel {
    /// The label bitmap.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Per-field outcomes.
    pub fn report(&self) -> &RenderReport {
        &self.report
    }

    /// Write the bitmap as a PNG file.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

fn signed(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Render `request` to a bitmap.
///
/// Never fails: a barcode the encoder cannot produce is replaced by a
/// hatched box, and text without a font is skipped. Both are recorded in
/// the returned report.
pub fn render_raster<E>(request: &RenderRequest<'_>, encoder: &E, assets: &RenderAssets) -> RasterLabel
where
    E: BarcodeEncoder + ?Sized,
{
    let settings = request.settings;
    let mut canvas = GrayImage::from_pixel(settings.width.max(1), settings.height.max(1), Luma([255]));
    let mut report = RenderReport::new();

    draw_outline(&mut canvas, 0, 0, signed(settings.width), signed(settings.height));
    draw_logo(&mut canvas, &mut report, settings, assets);

    for field in &request.fields {
        draw_field(&mut canvas, &mut report, settings, assets, encoder, field);
    }

    debug!(
        template = request.template.id(),
        fields = request.fields.len(),
        complete = report.is_complete(),
        "rendered raster label"
    );
    RasterLabel {
        image: canvas,
        report,
    }
}

fn draw_logo(canvas: &mut GrayImage, report: &mut RenderReport, settings: &LabelSettings, assets: &RenderAssets) {
    if let Some(logo) = &assets.logo {
        let resized = imageops::resize(
            logo,
            settings.logo_width.max(1),
            settings.logo_height.max(1),
            FilterType::Lanczos3,
        );
        imageops::replace(canvas, &resized, i64::from(settings.logo_x), i64::from(settings.logo_y));
        return;
    }
    match &assets.font {
        Some(font) => {
            draw_text(
                canvas,
                font,
                settings.font_company_size as f32,
                settings.logo_x,
                settings.logo_y,
                &settings.company_text,
            );
        }
        None => report.logo_degraded("no font available for company text"),
    }
}

fn draw_field<E>(
    canvas: &mut GrayImage,
    report: &mut RenderReport,
    settings: &LabelSettings,
    assets: &RenderAssets,
    encoder: &E,
    field: &RenderField,
) where
    E: BarcodeEncoder + ?Sized,
{
    let (x, y) = (field.position.x, field.position.y);
    let value_x = x + VALUE_OFFSET;

    let text_y = if field.has_barcode {
        let top = y + BARCODE_TOP;
        let (bw, bh) = (settings.barcode_width, settings.barcode_height);
        match encoder.encode(&field.text, bw, bh) {
            Ok(glyph) => imageops::replace(canvas, &glyph, i64::from(value_x), i64::from(top)),
            Err(err) => {
                draw_placeholder(canvas, value_x, top, signed(bw), signed(bh));
                report.degraded(field.id, format!("barcode: {err}"));
            }
        }
        y + signed(bh) + BARCODE_TEXT_GAP
    } else {
        y
    };

    let Some(font) = &assets.font else {
        report.degraded(field.id, "no font available for text");
        return;
    };
    draw_text(canvas, font, settings.font_label_size as f32, x, y, field.caption);
    draw_text(canvas, font, settings.font_data_size as f32, value_x, text_y, &field.text);
    report.rendered(field.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{PlaceholderEncoder, UnavailableEncoder};
    use crate::report::FieldOutcome;
    use serial_label_core::{FieldId, LabelContent, Template};

    fn black_in(img: &GrayImage, x: i32, y: i32, w: i32, h: i32) -> usize {
        let mut n = 0;
        for py in y.max(0)..(y + h).min(img.height() as i32) {
            for px in x.max(0)..(x + w).min(img.width() as i32) {
                if img.get_pixel(px as u32, py as u32)[0] == 0 {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn canvas_matches_settings_and_has_border() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::TextOnly);
        let label = render_raster(&req, &PlaceholderEncoder, &RenderAssets::new());
        assert_eq!(label.image().dimensions(), (490, 170));
        assert_eq!(label.image().get_pixel(0, 0)[0], 0);
        assert_eq!(label.image().get_pixel(489, 169)[0], 0);
        assert_eq!(label.image().get_pixel(245, 85)[0], 255);
    }

    #[test]
    fn barcodes_drawn_for_template_one() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::WithBarcodes);
        let label = render_raster(&req, &PlaceholderEncoder, &RenderAssets::new());

        let sn = settings.position(serial_label_core::Slot::Serial);
        let inked = black_in(
            label.image(),
            sn.x + VALUE_OFFSET,
            sn.y + BARCODE_TOP,
            settings.barcode_width as i32,
            settings.barcode_height as i32,
        );
        assert!(inked > 0);
    }

    #[test]
    fn missing_encoder_degrades_but_keeps_rendering() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::SerialBarcode);
        let label = render_raster(&req, &UnavailableEncoder::default(), &RenderAssets::new());
        let report = label.report();
        assert!(matches!(
            report.field(FieldId::Serial),
            Some(FieldOutcome::Degraded { reason }) if reason.starts_with("barcode")
        ));
        // Placeholder box outline is visible.
        let sn = settings.position(serial_label_core::Slot::Serial);
        let corner = label
            .image()
            .get_pixel((sn.x + VALUE_OFFSET) as u32, (sn.y + BARCODE_TOP) as u32);
        assert_eq!(corner[0], 0);
        // Every other shown field still has an entry.
        assert!(report.field(FieldId::Description).is_some());
        assert!(report.field(FieldId::Quantity).is_some());
    }

    fn dark_in(img: &GrayImage, x: i32, y: i32, w: i32, h: i32) -> usize {
        let mut n = 0;
        for py in y.max(0)..(y + h).min(img.height() as i32) {
            for px in x.max(0)..(x + w).min(img.width() as i32) {
                if img.get_pixel(px as u32, py as u32)[0] < 128 {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn default_assets_draw_text() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::TextOnly);
        let label = render_raster(&req, &PlaceholderEncoder, &RenderAssets::new());
        assert!(label.report().is_complete());

        let pn = settings.position(serial_label_core::Slot::PartNumber);
        let row_height = settings.font_label_size as i32 + 4;
        assert!(dark_in(label.image(), pn.x, pn.y, 20, row_height) > 0, "caption missing");
        assert!(
            dark_in(label.image(), pn.x + VALUE_OFFSET, pn.y, 80, row_height) > 0,
            "value missing"
        );
        assert!(
            dark_in(
                label.image(),
                settings.logo_x,
                settings.logo_y,
                settings.logo_width as i32,
                settings.logo_height as i32
            ) > 0,
            "company text missing"
        );
    }

    #[test]
    fn text_without_font_is_reported() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::TextOnly);
        let assets = RenderAssets::new().without_font();
        let label = render_raster(&req, &PlaceholderEncoder, &assets);
        assert!(!label.report().is_complete());
        assert!(!label.report().logo().is_rendered());
    }

    #[test]
    fn logo_image_replaces_company_text() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::TextOnly);
        let assets = RenderAssets::new().with_logo(GrayImage::from_pixel(10, 10, Luma([0])));
        let label = render_raster(&req, &PlaceholderEncoder, &assets);
        assert!(label.report().logo().is_rendered());
        let px = label.image().get_pixel(
            settings.logo_x as u32 + settings.logo_width / 2,
            settings.logo_y as u32 + settings.logo_height / 2,
        );
        assert_eq!(px[0], 0);
    }

    #[test]
    fn png_written_to_disk() {
        let settings = LabelSettings::default();
        let req = RenderRequest::build(&settings, &LabelContent::sample(), Template::WithBarcodes);
        let label = render_raster(&req, &PlaceholderEncoder, &RenderAssets::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        label.write_png(&path).unwrap();
        let back = image::open(&path).unwrap().to_luma8();
        assert_eq!(&back, label.image());
    }
}
