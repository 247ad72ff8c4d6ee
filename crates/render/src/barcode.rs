//! Barcode encoding capability.
//!
//! Renderers never talk to a symbology library directly; they ask a
//! [`BarcodeEncoder`] for a glyph and degrade to a placeholder box when it
//! fails. [`PlaceholderEncoder`] is the deterministic built-in encoder: its
//! bar pattern is derived from a SHA-256 digest of the data, so the same
//! input always produces the same pixels.

use image::{GrayImage, Luma};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Why a barcode could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// Nothing to encode.
    #[error("barcode data is empty")]
    EmptyData,
    /// The target box cannot hold the start and stop patterns.
    #[error("barcode box {width}x{height} is too small (minimum {min_width}x{min_height})")]
    TooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Smallest accepted width.
        min_width: u32,
        /// Smallest accepted height.
        min_height: u32,
    },
    /// The data contains characters the symbology cannot carry.
    #[error("barcode data {data:?} cannot be encoded: {reason}")]
    UnsupportedData {
        /// Offending input.
        data: String,
        /// Human-readable detail.
        reason: String,
    },
    /// No encoder backend is available.
    #[error("barcode encoder unavailable: {0}")]
    Unavailable(String),
}

/// Something that turns text into a barcode bitmap of a given size.
pub trait BarcodeEncoder {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Encode `data` into a `width` x `height` grayscale image
    /// (black bars on white).
    fn encode(&self, data: &str, width: u32, height: u32) -> Result<GrayImage, EncodeError>;
}

impl<T: BarcodeEncoder + ?Sized> BarcodeEncoder for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, data: &str, width: u32, height: u32) -> Result<GrayImage, EncodeError> {
        (**self).encode(data, width, height)
    }
}

impl<T: BarcodeEncoder + ?Sized> BarcodeEncoder for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, data: &str, width: u32, height: u32) -> Result<GrayImage, EncodeError> {
        (**self).encode(data, width, height)
    }
}

const MARGIN: u32 = 10;
const STOP_RESERVE: u32 = 20;
const BAR_TOP: u32 = 3;
const BAR_BOTTOM_INSET: u32 = 3;
const DIGEST_BYTES: usize = 10;
const START_PATTERN: [bool; 8] = [true, true, false, true, false, true, true, false];
const STOP_PATTERN: [bool; 7] = [true, true, false, false, true, true, true];

/// Smallest box [`PlaceholderEncoder`] accepts.
pub const PLACEHOLDER_MIN_WIDTH: u32 = 2 * MARGIN + STOP_RESERVE;
/// Smallest box height [`PlaceholderEncoder`] accepts.
pub const PLACEHOLDER_MIN_HEIGHT: u32 = BAR_TOP + BAR_BOTTOM_INSET + 2;

/// Deterministic Code128-looking bar pattern.
///
/// Layout, left to right inside a 10 px margin:
/// a fixed start pattern (`1,1,0,1,0,1,1,0`, wide bars for `1`), then four
/// bars per digest byte for the first ten SHA-256 bytes (bit `n` of the
/// byte decides whether bar `n` is inked; every bar of a byte is wide when
/// `byte % 3 == 0`), then a narrow stop pattern (`1,1,0,0,1,1,1`). Bars
/// span rows `3..=height-3`. This is not a scannable symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEncoder;

impl BarcodeEncoder for PlaceholderEncoder {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn encode(&self, data: &str, width: u32, height: u32) -> Result<GrayImage, EncodeError> {
        if data.is_empty() {
            return Err(EncodeError::EmptyData);
        }
        if width < PLACEHOLDER_MIN_WIDTH || height < PLACEHOLDER_MIN_HEIGHT {
            return Err(EncodeError::TooSmall {
                width,
                height,
                min_width: PLACEHOLDER_MIN_WIDTH,
                min_height: PLACEHOLDER_MIN_HEIGHT,
            });
        }

        let usable = width - 2 * MARGIN;
        let chars = u32::try_from(data.chars().count()).unwrap_or(u32::MAX);
        let bar_count = chars.saturating_mul(6).min(usable / 2).max(1);
        let narrow = (usable / (bar_count * 3)).max(1);
        let wide = narrow * 2;

        let mut bars = Bars::new(width, height);
        let mut x = MARGIN;

        for inked in START_PATTERN {
            let w = if inked { wide } else { narrow };
            if inked {
                bars.fill(x, w);
            }
            x += w;
            if x >= width - MARGIN {
                break;
            }
        }

        let data_limit = width - MARGIN - STOP_RESERVE;
        let digest = Sha256::digest(data.as_bytes());
        'data: for &byte in digest.iter().take(DIGEST_BYTES) {
            if x >= data_limit {
                break;
            }
            let w = if byte % 3 == 0 { wide } else { narrow };
            for bit in 0..4 {
                if (byte >> bit) & 1 == 1 {
                    bars.fill(x, w);
                }
                x += w;
                if x >= data_limit {
                    break 'data;
                }
            }
        }

        if x < width - MARGIN {
            for inked in STOP_PATTERN {
                if x >= width - 5 {
                    break;
                }
                if inked {
                    bars.fill(x, narrow);
                }
                x += narrow;
            }
        }

        Ok(bars.into_image())
    }
}

struct Bars {
    image: GrayImage,
    top: u32,
    bottom: u32,
}

impl Bars {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, Luma([255])),
            top: BAR_TOP,
            bottom: height - BAR_BOTTOM_INSET,
        }
    }

    fn fill(&mut self, x: u32, w: u32) {
        let right = (x + w).min(self.image.width());
        let bottom = self.bottom.min(self.image.height() - 1);
        for px in x..right {
            for py in self.top..=bottom {
                self.image.put_pixel(px, py, Luma([0]));
            }
        }
    }

    fn into_image(self) -> GrayImage {
        self.image
    }
}

/// An encoder that always fails, standing in for a missing backend.
#[derive(Debug, Clone, Default)]
pub struct UnavailableEncoder {
    reason: String,
}

impl UnavailableEncoder {
    /// Fail every request with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl BarcodeEncoder for UnavailableEncoder {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn encode(&self, _data: &str, _width: u32, _height: u32) -> Result<GrayImage, EncodeError> {
        let reason = if self.reason.is_empty() {
            "no barcode backend configured".to_string()
        } else {
            self.reason.clone()
        };
        Err(EncodeError::Unavailable(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_inked(img: &GrayImage, x: u32) -> bool {
        (0..img.height()).any(|y| img.get_pixel(x, y)[0] == 0)
    }

    #[test]
    fn placeholder_is_deterministic() {
        let a = PlaceholderEncoder.encode("CDL2349-1195", 255, 23).unwrap();
        let b = PlaceholderEncoder.encode("CDL2349-1195", 255, 23).unwrap();
        assert_eq!(a, b);
        let c = PlaceholderEncoder.encode("CDL2349-1196", 255, 23).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn placeholder_respects_margins_and_rows() {
        let img = PlaceholderEncoder.encode("CZ5S1000B", 255, 23).unwrap();
        assert_eq!(img.dimensions(), (255, 23));
        for x in 0..MARGIN {
            assert!(!column_inked(&img, x), "margin column {x} inked");
        }
        // First start bar begins right at the margin.
        assert!(column_inked(&img, MARGIN));
        for y in (0..BAR_TOP).chain(23 - BAR_BOTTOM_INSET + 1..23) {
            assert!((0..255).all(|x| img.get_pixel(x, y)[0] == 255), "row {y} inked");
        }
        assert_eq!(img.get_pixel(MARGIN, BAR_TOP)[0], 0);
        assert_eq!(img.get_pixel(MARGIN, 23 - BAR_BOTTOM_INSET)[0], 0);
    }

    #[test]
    fn placeholder_rejects_empty_and_tiny() {
        assert_eq!(
            PlaceholderEncoder.encode("", 255, 23),
            Err(EncodeError::EmptyData)
        );
        assert!(matches!(
            PlaceholderEncoder.encode("02", 20, 23),
            Err(EncodeError::TooSmall { .. })
        ));
        assert!(matches!(
            PlaceholderEncoder.encode("02", 255, 4),
            Err(EncodeError::TooSmall { .. })
        ));
    }

    #[test]
    fn unavailable_always_fails() {
        let err = UnavailableEncoder::default().encode("02", 255, 23).unwrap_err();
        assert!(matches!(err, EncodeError::Unavailable(_)));
    }
}
