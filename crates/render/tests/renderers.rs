//! Both renderers driven from a looked-up dataset row.

use serial_label_core::{
    Cell, Dataset, DatasetRow, FieldId, LabelContent, LabelSettings, RenderRequest, lookup,
    resolve_template,
};
use serial_label_render::{
    BarcodeEncoder, FieldOutcome, PlaceholderEncoder, RenderAssets, UnavailableEncoder,
    render_raster, render_zpl,
};

fn dataset() -> Dataset {
    let row = DatasetRow::new([
        ("SL.From", Cell::from("CDL2349-1000")),
        ("SL.End", Cell::from("CDL2349-1999")),
        ("P/N", Cell::from("CZ5S1000B")),
        ("Rev", Cell::from("03")),
        ("Template", Cell::from("1")),
    ]);
    Dataset::new(
        vec![
            "SL.From".into(),
            "SL.End".into(),
            "P/N".into(),
            "Rev".into(),
            "Template".into(),
        ],
        vec![row],
    )
}

#[test]
fn same_request_feeds_both_renderers() {
    let ds = dataset();
    let settings = LabelSettings::default();
    let found = lookup(&ds, "CDL2349-1195").unwrap();
    let row = found.row().unwrap();
    let template = resolve_template(settings.template, Some(row));
    let content = LabelContent::from_match(row, "CDL2349-1195");
    let request = RenderRequest::build(&settings, &content, template);

    let raster = render_raster(&request, &PlaceholderEncoder, &RenderAssets::new());
    assert!(raster.report().is_complete());

    let bare = render_raster(&request, &PlaceholderEncoder, &RenderAssets::new().without_font());
    for id in [FieldId::PartNumber, FieldId::Revision, FieldId::Serial] {
        // Barcodes drew; only text degraded for lack of a font.
        assert_eq!(
            bare.report().field(id),
            Some(&FieldOutcome::Degraded {
                reason: "no font available for text".into()
            })
        );
    }

    let zpl = render_zpl(&request, &RenderAssets::new());
    assert!(zpl.report().is_complete());
    assert!(zpl.as_str().contains("^FDCZ5S1000B^FS"));
    assert!(zpl.as_str().contains("^FD03^FS"));
}

#[test]
fn boxed_encoder_renders_like_direct() {
    let encoder: Box<dyn BarcodeEncoder> = Box::new(PlaceholderEncoder);
    let settings = LabelSettings::default();
    let request = RenderRequest::build(&settings, &LabelContent::sample(), settings.template);

    let boxed = render_raster(&request, &encoder, &RenderAssets::new());
    let direct = render_raster(&request, &PlaceholderEncoder, &RenderAssets::new());
    assert_eq!(boxed.image(), direct.image());
}

#[test]
fn unavailable_encoder_never_blanks_the_label() {
    let settings = LabelSettings::default();
    let request = RenderRequest::build(&settings, &LabelContent::sample(), settings.template);
    let label = render_raster(&request, &UnavailableEncoder::default(), &RenderAssets::new());
    let inked = label.image().pixels().filter(|p| p[0] == 0).count();
    assert!(inked > 0);
    for id in [FieldId::PartNumber, FieldId::Revision, FieldId::Serial] {
        let Some(FieldOutcome::Degraded { reason }) = label.report().field(id) else {
            panic!("{id} should be degraded");
        };
        assert!(reason.starts_with("barcode:"), "{reason}");
    }
}

#[test]
fn zpl_written_to_file() {
    let settings = LabelSettings::default();
    let request = RenderRequest::build(&settings, &LabelContent::sample(), settings.template);
    let zpl = render_zpl(&request, &RenderAssets::new());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("label.zpl");
    zpl.write_to(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), zpl.as_str());
}
