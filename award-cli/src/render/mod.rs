//! Certificate text rendering
//!
//! Layout code only talks to [`TextFace`], so it works the same whether the
//! preferred font loaded or the bitmap fallback is in use.

mod face;
mod layout;

pub use face::{BitmapFace, OutlineFace};
pub use layout::{normalize_for_export, render_certificate};

use std::path::{Path, PathBuf};

use image::{Rgb, RgbaImage};

use crate::config::{FontConfig, TextStyleConfig};

/// Ink box of a text relative to its draw origin (PIL-style left, top, right, bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn union(&self, other: &TextBox) -> TextBox {
        TextBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Measure and draw text in one typeface
pub trait TextFace {
    fn measure(&self, text: &str) -> TextBox;
    fn draw(&self, canvas: &mut RgbaImage, origin: (i32, i32), text: &str, color: Rgb<u8>);
    /// Human-readable name for logs
    fn describe(&self) -> String;
}

/// Fill and border of an outlined text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub fill: Rgb<u8>,
    pub border: Rgb<u8>,
    pub thickness: u32,
}

impl From<TextStyleConfig> for TextStyle {
    fn from(config: TextStyleConfig) -> Self {
        Self {
            fill: Rgb(config.fill),
            border: Rgb(config.border),
            thickness: config.thickness,
        }
    }
}

/// Draw `text` in the border colour at every offset within `thickness`
/// (except the centre), then once in the fill colour at `origin`.
pub fn draw_outlined(
    canvas: &mut RgbaImage,
    face: &dyn TextFace,
    text: &str,
    origin: (i32, i32),
    style: &TextStyle,
) {
    let t = style.thickness as i32;
    for dx in -t..=t {
        for dy in -t..=t {
            if dx == 0 && dy == 0 {
                continue;
            }
            face.draw(canvas, (origin.0 + dx, origin.1 + dy), text, style.border);
        }
    }
    face.draw(canvas, origin, text, style.fill);
}

/// Blend `color` over the pixel at (x, y); out-of-bounds coordinates are ignored
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        let bg = pixel.0[channel] as f32;
        let fg = color.0[channel] as f32;
        pixel.0[channel] = (bg + (fg - bg) * coverage).round() as u8;
    }
    pixel.0[3] = pixel.0[3].max((coverage * 255.0).round() as u8);
}

/// One face per text role, chosen once per run
pub struct FontSet {
    pub name: Box<dyn TextFace>,
    pub number: Box<dyn TextFace>,
    pub date: Box<dyn TextFace>,
}

impl FontSet {
    /// Load the preferred fonts, falling back to the bitmap face per role
    pub fn load(config: &FontConfig, base_dir: &Path) -> Self {
        Self {
            name: load_face("name", &config.name, config, base_dir),
            number: load_face("number", &config.number, config, base_dir),
            date: load_face("date", &config.date, config, base_dir),
        }
    }

    /// All roles on the bitmap face
    #[cfg(test)]
    pub fn fallback(size: f32) -> Self {
        Self {
            name: Box::new(BitmapFace::for_size(size)),
            number: Box::new(BitmapFace::for_size(size)),
            date: Box::new(BitmapFace::for_size(size)),
        }
    }
}

fn load_face(role: &str, file: &str, config: &FontConfig, base_dir: &Path) -> Box<dyn TextFace> {
    let Some(path) = resolve_font(file, base_dir, &config.search_dirs) else {
        log::warn!("Font '{}' for {} not found, using built-in font", file, role);
        return Box::new(BitmapFace::for_size(config.size));
    };

    match OutlineFace::load(&path, config.size) {
        Ok(face) => {
            log::info!("Using {} for {}", face.describe(), role);
            Box::new(face)
        }
        Err(e) => {
            log::warn!("{:#}; using built-in font for {}", e, role);
            Box::new(BitmapFace::for_size(config.size))
        }
    }
}

const FONT_SEARCH_DEPTH: usize = 4;

/// Find a font file: as given (relative to `base_dir`), then inside the search directories
pub fn resolve_font(file: &str, base_dir: &Path, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = base_dir.join(file);
    if direct.is_file() {
        return Some(direct);
    }

    let wanted = Path::new(file).file_name()?.to_string_lossy().to_lowercase();
    search_dirs
        .iter()
        .find_map(|dir| find_file(dir, &wanted, FONT_SEARCH_DEPTH))
}

fn find_file(dir: &Path, wanted: &str, depth: usize) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name().to_string_lossy().to_lowercase() == wanted {
            return Some(path);
        }
    }

    if depth == 0 {
        return None;
    }
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, wanted, depth - 1))
}
