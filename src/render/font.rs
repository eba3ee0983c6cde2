use ab_glyph::{FontVec, PxScale};
use image::Pixel;
use imageproc::definitions::Clamp;
use imageproc::drawing::{Canvas, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

use super::glyphs::{GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH, lit_cells};

/// Font used to draw the date.
///
/// A TrueType font is loaded from disk when available; otherwise the
/// built-in bitmap font is used. Both measure and draw the same way, so the
/// rest of the pipeline never needs to know which one it got.
pub enum StampFont {
    TrueType { font: FontVec, scale: PxScale },
    Builtin { cell: u32 },
}

impl StampFont {
    /// Load the font at `path` at `size` pixels, falling back to the built-in
    /// font when the file is missing or unreadable.
    pub fn load(path: Option<&Path>, size: u32) -> Self {
        let Some(path) = path else {
            log::debug!("No font configured, using built-in font");
            return Self::builtin(size);
        };

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Font {} not available ({e}), using built-in font", path.display());
                return Self::builtin(size);
            }
        };

        match FontVec::try_from_vec(data) {
            Ok(font) => {
                log::debug!("Loaded font {}", path.display());
                Self::TrueType {
                    font,
                    scale: PxScale::from(size as f32),
                }
            }
            Err(e) => {
                log::warn!("Font {} is invalid ({e}), using built-in font", path.display());
                Self::builtin(size)
            }
        }
    }

    /// Built-in bitmap font sized so its cell height approximates `size`.
    pub fn builtin(size: u32) -> Self {
        Self::Builtin {
            cell: (size / 8).max(1),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Width and height of the box `text` occupies when drawn.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            Self::TrueType { font, scale } => text_size(*scale, font, text),
            Self::Builtin { cell } => {
                let count = text.chars().count() as u32;
                if count == 0 {
                    return (0, 0);
                }
                let width = count * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING;
                (width * cell, GLYPH_HEIGHT * cell)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Parts falling
    /// outside the canvas are clipped.
    pub fn draw<C>(&self, canvas: &mut C, color: C::Pixel, x: i32, y: i32, text: &str)
    where
        C: Canvas,
        <C::Pixel as Pixel>::Subpixel: Into<f32> + Clamp<f32>,
    {
        match self {
            Self::TrueType { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            Self::Builtin { cell } => {
                let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * cell) as i32;
                let size = *cell as i32;
                for (i, c) in text.chars().enumerate() {
                    let origin_x = x + i as i32 * advance;
                    for (col, row) in lit_cells(c) {
                        let rect = Rect::at(origin_x + col as i32 * size, y + row as i32 * size)
                            .of_size(*cell, *cell);
                        draw_filled_rect_mut(canvas, rect, color);
                    }
                }
            }
        }
    }
}
