//! Optional logo image and font used by the renderers.

use std::fmt;
use std::fs;
use std::path::Path;

use image::GrayImage;
use rusttype::Font;
use thiserror::Error;

/// Errors loading a logo or font from disk.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The logo file is not a decodable image.
    #[error("failed to decode logo {path}: {source}")]
    Image {
        /// File that failed.
        path: String,
        /// Underlying decoder error.
        source: image::ImageError,
    },
    /// The font file is not a usable TrueType/OpenType font.
    #[error("{path} is not a usable TrueType font")]
    Font {
        /// File that failed.
        path: String,
    },
}

/// Decode a logo image and convert it to grayscale.
pub fn load_logo(path: impl AsRef<Path>) -> Result<GrayImage, AssetError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| AssetError::Image {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_luma8())
}

/// Load a TrueType font.
pub fn load_font(path: impl AsRef<Path>) -> Result<Font<'static>, AssetError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| AssetError::Font {
        path: path.display().to_string(),
    })
}

/// DejaVu Sans, compiled in so raster text renders without a font on disk.
static BUILTIN_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// The compiled-in font.
pub fn builtin_font() -> Option<Font<'static>> {
    Font::try_from_bytes(BUILTIN_FONT)
}

/// Logo and font available to a render call.
///
/// Without a logo the renderers draw the company text. The font starts as
/// [`builtin_font`]; raster text is only reported degraded when the font
/// has been removed with [`RenderAssets::without_font`].
#[derive(Clone)]
pub struct RenderAssets {
    /// Logo bitmap, resized to the settings' logo box when drawn.
    pub logo: Option<GrayImage>,
    /// Font for raster text.
    pub font: Option<Font<'static>>,
}

impl Default for RenderAssets {
    fn default() -> Self {
        Self {
            logo: None,
            font: builtin_font(),
        }
    }
}

impl RenderAssets {
    /// No logo, built-in font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `logo` for the logo box.
    pub fn with_logo(mut self, logo: GrayImage) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Use `font` for raster text instead of the built-in one.
    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    /// Drop the font; raster text is then skipped and reported.
    pub fn without_font(mut self) -> Self {
        self.font = None;
        self
    }
}

impl fmt::Debug for RenderAssets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderAssets")
            .field("logo", &self.logo.as_ref().map(GrayImage::dimensions))
            .field("font", &self.font.as_ref().map(|_| "loaded"))
            .finish()
    }
}
