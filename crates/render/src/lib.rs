//! Label renderers for serial-label.
//!
//! Two renderers share one input, a [`RenderRequest`](serial_label_core::RenderRequest):
//! [`render_raster`] draws a grayscale bitmap (written out with
//! [`RasterLabel::write_png`]) and [`render_zpl`] builds a print-ready ZPL II
//! document. Neither aborts on a failed part. A barcode that cannot be
//! produced becomes a visible placeholder and the [`RenderReport`] records
//! which fields degraded.

#![warn(missing_docs)]

/// Logo and font loading.
pub mod assets;
/// Barcode encoder capability and the built-in encoders.
pub mod barcode;
/// Bitmap renderer.
pub mod raster;
/// Per-field render outcomes.
pub mod report;
mod text;
/// ZPL II renderer.
pub mod zpl;

pub use assets::{AssetError, RenderAssets, builtin_font, load_font, load_logo};
pub use barcode::{BarcodeEncoder, EncodeError, PlaceholderEncoder, UnavailableEncoder};
pub use raster::{RasterError, RasterLabel, render_raster};
pub use report::{FieldOutcome, RenderReport};
pub use zpl::{ZplLabel, escape_field_data, graphic_field, render_zpl};
