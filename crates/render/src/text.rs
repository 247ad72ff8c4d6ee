//! TrueType text and simple shape drawing onto grayscale canvases.

use image::{GrayImage, Luma};
use rusttype::{Font, Scale, point};

/// Draw `text` with its top-left corner at `(x, y)`, black on whatever is
/// already there. Returns the advance width in pixels.
pub(crate) fn draw_text(
    canvas: &mut GrayImage,
    font: &Font<'_>,
    size: f32,
    x: i32,
    y: i32,
    text: &str,
) -> i32 {
    let scale = Scale::uniform(size);
    let ascent = font.v_metrics(scale).ascent;
    let origin = point(x as f32, y as f32 + ascent);
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);

    let mut right = x as f32;
    for glyph in font.layout(text, scale, origin) {
        right = glyph.position().x + glyph.unpositioned().h_metrics().advance_width;
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            let ink = 255 - (coverage.clamp(0.0, 1.0) * 255.0) as u8;
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            pixel[0] = pixel[0].min(ink);
        });
    }
    (right - x as f32).ceil() as i32
}

/// Set one pixel to black if it lies on the canvas.
fn ink(canvas: &mut GrayImage, x: i32, y: i32) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, Luma([0]));
    }
}

/// One-pixel rectangle outline covering `[x, x+w) x [y, y+h)`.
pub(crate) fn draw_outline(canvas: &mut GrayImage, x: i32, y: i32, w: i32, h: i32) {
    if w <= 0 || h <= 0 {
        return;
    }
    for dx in 0..w {
        ink(canvas, x + dx, y);
        ink(canvas, x + dx, y + h - 1);
    }
    for dy in 0..h {
        ink(canvas, x, y + dy);
        ink(canvas, x + w - 1, y + dy);
    }
}

/// Outlined box with a diagonal hatch, marking a glyph that failed to render.
pub(crate) fn draw_placeholder(canvas: &mut GrayImage, x: i32, y: i32, w: i32, h: i32) {
    draw_outline(canvas, x, y, w, h);
    for dy in 1..h - 1 {
        for dx in 1..w - 1 {
            if (dx + dy) % 6 == 0 {
                ink(canvas, x + dx, y + dy);
            }
        }
    }
}
