//! Text engine — shapes single lines and rasterizes glyphs using `cosmic-text`.
//!
//! The engine manages a `FontSystem` (font discovery + shaping) and a
//! `SwashCache` (glyph rasterization). A shaped line is returned as its
//! advance width plus a list of glyph bitmaps positioned relative to the
//! pen origin on the baseline, ready to be composited onto a canvas.
//!
//! The face is fixed: generic sans-serif at bold weight.

use std::path::Path;

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight,
};

/// Pixel format of a rasterized glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphContent {
    /// One coverage byte per pixel.
    Mask,
    /// Four bytes per pixel, per-channel coverage.
    SubpixelMask,
    /// Four bytes per pixel, straight RGBA (color emoji and the like).
    Color,
}

impl From<SwashContent> for GlyphContent {
    fn from(content: SwashContent) -> Self {
        match content {
            SwashContent::Mask => Self::Mask,
            SwashContent::SubpixelMask => Self::SubpixelMask,
            SwashContent::Color => Self::Color,
        }
    }
}

/// A rasterized glyph positioned relative to the line origin.
///
/// `left`/`top` locate the top-left corner of the bitmap; `top` is negative
/// for pixels above the baseline.
#[derive(Clone, Debug)]
pub struct GlyphBitmap {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub content: GlyphContent,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// Coverage (0–255) of the bitmap pixel at `(x, y)`.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        let idx = (y * self.width + x) as usize;
        match self.content {
            GlyphContent::Mask => self.data.get(idx).copied().unwrap_or(0),
            GlyphContent::SubpixelMask => self
                .data
                .get(idx * 4..idx * 4 + 3)
                .map(|px| px.iter().copied().max().unwrap_or(0))
                .unwrap_or(0),
            GlyphContent::Color => self.data.get(idx * 4 + 3).copied().unwrap_or(0),
        }
    }
}

/// Rendered bounding box of a line, relative to the pen origin on the baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl InkBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn union(self, other: InkBounds) -> InkBounds {
        InkBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Result of shaping one line of text.
#[derive(Clone, Debug, Default)]
pub struct ShapedLine {
    /// Advance width in pixels (the pen position after the last glyph).
    pub advance: f32,
    /// Glyph bitmaps; whitespace produces none.
    pub glyphs: Vec<GlyphBitmap>,
    /// Union of all glyph bitmaps, `None` when nothing is inked.
    pub ink: Option<InkBounds>,
}

impl ShapedLine {
    /// Width of the rendered bounding box, 0 for an un-inked line.
    pub fn ink_width(&self) -> i32 {
        self.ink.map(|b| b.width()).unwrap_or(0)
    }
}

/// Core text engine wrapping cosmic-text.
pub struct TextEngine {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Create a new text engine with system font discovery.
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        log::info!(
            "TextEngine: {} font faces available (locale {})",
            font_system.db().len(),
            font_system.locale(),
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// Number of font faces the engine can shape with.
    pub fn face_count(&self) -> usize {
        self.font_system.db().len()
    }

    /// Register an in-memory font file (TTF/OTF/TTC).
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        let before = self.face_count();
        self.font_system.db_mut().load_font_data(data);
        log::debug!("Loaded {} face(s) from memory", self.face_count() - before);
    }

    /// Register every font file found under `dir` (recursively).
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let before = self.face_count();
        self.font_system.db_mut().load_fonts_dir(dir);
        log::info!(
            "Loaded {} face(s) from {}",
            self.face_count() - before,
            dir.display(),
        );
    }

    /// Number of glyph images held by the rasterization cache.
    pub fn cached_glyph_count(&self) -> usize {
        self.swash_cache.image_cache.len()
    }

    /// Lay out one line without wrapping; callers split on `'\n'` first.
    fn shape_buffer(&mut self, line: &str, font_size: f32) -> Buffer {
        let metrics = Metrics::new(font_size, font_size);
        let attrs = Attrs::new().family(Family::SansSerif).weight(Weight::BOLD);

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, line, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    fn buffer_advance(buffer: &Buffer) -> f32 {
        buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter())
            .map(|g| g.x + g.w)
            .fold(0.0f32, f32::max)
    }

    /// Advance width of `line` in pixels. Shapes only; no glyph is rasterized.
    pub fn measure_text(&mut self, line: &str, font_size: f32) -> f32 {
        let buffer = self.shape_buffer(line, font_size);
        Self::buffer_advance(&buffer)
    }

    /// Shape and rasterize a single line at `font_size` pixels.
    pub fn shape_line(&mut self, line: &str, font_size: f32) -> ShapedLine {
        let buffer = self.shape_buffer(line, font_size);

        let mut shaped = ShapedLine {
            advance: Self::buffer_advance(&buffer),
            ..ShapedLine::default()
        };

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, 0.0), 1.0);

                let image = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key);

                let image = match image {
                    Some(img) => img,
                    None => continue, // missing glyph
                };

                if image.placement.width == 0 || image.placement.height == 0 {
                    continue; // whitespace
                }

                let bitmap = GlyphBitmap {
                    left: physical.x + image.placement.left,
                    top: physical.y - image.placement.top,
                    width: image.placement.width,
                    height: image.placement.height,
                    content: image.content.into(),
                    data: image.data.clone(),
                };

                let bounds = InkBounds {
                    left: bitmap.left,
                    top: bitmap.top,
                    right: bitmap.left + bitmap.width as i32,
                    bottom: bitmap.top + bitmap.height as i32,
                };
                shaped.ink = Some(match shaped.ink {
                    Some(ink) => ink.union(bounds),
                    None => bounds,
                });
                shaped.glyphs.push(bitmap);
            }
        }

        shaped
    }

    /// Rendered bounding box of `line`, `None` if nothing would be drawn.
    pub fn text_bounds(&mut self, line: &str, font_size: f32) -> Option<InkBounds> {
        self.shape_line(line, font_size).ink
    }
}

// ===================================================================
// Tests
// ===================================================================
