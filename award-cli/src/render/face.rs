//! Text faces: TrueType/OpenType outlines and the built-in bitmap fallback

use std::path::Path;

use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbaImage};

use super::{TextBox, TextFace, blend_pixel};

/// A scalable font file rendered with ab_glyph
pub struct OutlineFace {
    font: FontVec,
    scale: PxScale,
    label: String,
}

impl OutlineFace {
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font: {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| anyhow::anyhow!("Invalid font {}: {}", path.display(), e))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
            label: path.display().to_string(),
        })
    }

    /// Glyphs positioned on a baseline one ascent below the origin
    fn layout(&self, text: &str) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let ascent = scaled.ascent();
        let mut caret = 0.0f32;
        let mut previous = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            let mut glyph = scaled.scaled_glyph(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, glyph.id);
            }
            glyph.position = point(caret, ascent);
            caret += scaled.h_advance(glyph.id);
            previous = Some(glyph.id);
            glyphs.push(glyph);
        }

        (glyphs, caret)
    }
}

impl TextFace for OutlineFace {
    fn measure(&self, text: &str) -> TextBox {
        let (glyphs, advance) = self.layout(text);
        let mut bounds: Option<TextBox> = None;

        for glyph in glyphs {
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let px = outlined.px_bounds();
                let glyph_box = TextBox {
                    left: px.min.x.floor() as i32,
                    top: px.min.y.floor() as i32,
                    right: px.max.x.ceil() as i32,
                    bottom: px.max.y.ceil() as i32,
                };
                bounds = Some(match bounds {
                    Some(b) => b.union(&glyph_box),
                    None => glyph_box,
                });
            }
        }

        // Whitespace-only text has no outlines; fall back to the line box.
        bounds.unwrap_or_else(|| {
            let scaled = self.font.as_scaled(self.scale);
            TextBox {
                left: 0,
                top: 0,
                right: advance.ceil() as i32,
                bottom: (scaled.ascent() - scaled.descent()).ceil() as i32,
            }
        })
    }

    fn draw(&self, canvas: &mut RgbaImage, origin: (i32, i32), text: &str, color: Rgb<u8>) {
        let (glyphs, _) = self.layout(text);
        for glyph in glyphs {
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let min = outlined.px_bounds().min;
                let base_x = origin.0 + min.x.floor() as i32;
                let base_y = origin.1 + min.y.floor() as i32;
                outlined.draw(|gx, gy, coverage| {
                    blend_pixel(canvas, base_x + gx as i32, base_y + gy as i32, color, coverage);
                });
            }
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// 8x8 bitmap glyphs scaled up by an integer factor
pub struct BitmapFace {
    scale: u32,
}

const CELL: u32 = 8;

impl BitmapFace {
    /// Scale chosen so the glyph cell is about `size` pixels high
    pub fn for_size(size: f32) -> Self {
        let scale = (size / CELL as f32).round().max(1.0) as u32;
        Self { scale }
    }

    #[cfg(test)]
    pub fn with_scale(scale: u32) -> Self {
        Self { scale: scale.max(1) }
    }

    fn glyph(c: char) -> [u8; 8] {
        BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }

    fn cell(&self) -> i32 {
        (CELL * self.scale) as i32
    }
}

impl TextFace for BitmapFace {
    fn measure(&self, text: &str) -> TextBox {
        TextBox {
            left: 0,
            top: 0,
            right: self.cell() * text.chars().count() as i32,
            bottom: self.cell(),
        }
    }

    fn draw(&self, canvas: &mut RgbaImage, origin: (i32, i32), text: &str, color: Rgb<u8>) {
        let scale = self.scale as i32;
        for (index, c) in text.chars().enumerate() {
            let glyph_x = origin.0 + index as i32 * self.cell();
            for (row, bits) in Self::glyph(c).iter().enumerate() {
                for col in 0..CELL {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let x0 = glyph_x + col as i32 * scale;
                    let y0 = origin.1 + row as i32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            blend_pixel(canvas, x0 + dx, y0 + dy, color, 1.0);
                        }
                    }
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!("built-in bitmap font (x{})", self.scale)
    }
}
