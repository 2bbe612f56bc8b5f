//! Raster image — owned RGBA8 pixel buffer with straight alpha.
//!
//! Pixels are stored row-major as [`Rgba`] values, which are `Pod` so the
//! buffer can be viewed as raw bytes (for PNG encoding or handing to a
//! display surface) without copying.

use std::io::Cursor;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::engine::{GlyphBitmap, GlyphContent};

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Cannot encode an empty {0}x{1} image")]
    Empty(u32, u32),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One RGBA8 pixel (straight alpha).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Source-over composite of `src` onto `self`.
    pub fn blend_over(self, src: Rgba) -> Rgba {
        if src.a == 255 || self.a == 0 {
            return src;
        }
        if src.a == 0 {
            return self;
        }
        let sa = src.a as f32 / 255.0;
        let da = self.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| -> u8 {
            let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: channel(src.r, self.r),
            g: channel(src.g, self.g),
            b: channel(src.b, self.b),
            a: (out_a * 255.0).round() as u8,
        }
    }
}

/// Owned pixel buffer produced by the rasterizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    /// A fully transparent image. Either dimension may be zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Wrap existing pixels; `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the image has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = px;
        }
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.a != 0).count()
    }

    /// Smallest `(x0, y0, x1, y1)` (exclusive max) enclosing every non-transparent pixel.
    pub fn opaque_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixels[(y * self.width + x) as usize].a == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                    None => (x, y, x + 1, y + 1),
                });
            }
        }
        bounds
    }

    /// Composite a glyph bitmap in `color` with its origin at `(x, y)`.
    ///
    /// Parts of the glyph outside the canvas are clipped.
    pub fn draw_glyph(&mut self, glyph: &GlyphBitmap, x: i32, y: i32, color: Rgba) {
        for gy in 0..glyph.height {
            let py = y + glyph.top + gy as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for gx in 0..glyph.width {
                let px = x + glyph.left + gx as i32;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                let coverage = glyph.coverage(gx, gy);
                if coverage == 0 {
                    continue;
                }
                let src = match glyph.content {
                    GlyphContent::Color => {
                        let i = ((gy * glyph.width + gx) * 4) as usize;
                        Rgba::new(glyph.data[i], glyph.data[i + 1], glyph.data[i + 2], coverage)
                    }
                    _ => Rgba {
                        a: ((color.a as u16 * coverage as u16 + 127) / 255) as u8,
                        ..color
                    },
                };
                let idx = (py as u32 * self.width + px as u32) as usize;
                self.pixels[idx] = self.pixels[idx].blend_over(src);
            }
        }
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        if self.is_empty() {
            return Err(RasterError::Empty(self.width, self.height));
        }
        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            self.as_bytes(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(out.into_inner())
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(width: u32, height: u32, value: u8) -> GlyphBitmap {
        GlyphBitmap {
            left: 0,
            top: -(height as i32),
            width,
            height,
            content: GlyphContent::Mask,
            data: vec![value; (width * height) as usize],
        }
    }

    #[test]
    fn test_new_is_transparent() {
        let img = RasterImage::new(4, 3);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.pixels().len(), 12);
        assert_eq!(img.opaque_count(), 0);
        assert!(img.opaque_bounds().is_none());
    }

    #[test]
    fn test_zero_area_image() {
        let img = RasterImage::new(0, 220);
        assert!(img.is_empty());
        assert_eq!(img.height(), 220);
        assert!(img.pixel(0, 0).is_none());
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(RasterImage::from_pixels(2, 2, vec![Rgba::WHITE; 4]).is_some());
        assert!(RasterImage::from_pixels(2, 2, vec![Rgba::WHITE; 3]).is_none());
    }

    #[test]
    fn test_as_bytes_layout() {
        let img = RasterImage::from_pixels(1, 1, vec![Rgba::new(1, 2, 3, 4)]).unwrap();
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_blend_over_opaque_replaces() {
        let dst = Rgba::new(10, 20, 30, 255);
        assert_eq!(dst.blend_over(Rgba::WHITE), Rgba::WHITE);
        assert_eq!(dst.blend_over(Rgba::TRANSPARENT), dst);
    }

    #[test]
    fn test_blend_over_accumulates_alpha() {
        let half = Rgba::new(255, 255, 255, 128);
        let out = half.blend_over(half);
        assert!(out.a > 128 && out.a < 255, "alpha {}", out.a);
        assert_eq!((out.r, out.g, out.b), (255, 255, 255));
    }

    #[test]
    fn test_draw_glyph_places_on_baseline() {
        let mut img = RasterImage::new(10, 10);
        img.draw_glyph(&mask(2, 3, 255), 4, 8, Rgba::WHITE);
        assert_eq!(img.opaque_bounds(), Some((4, 5, 6, 8)));
        assert_eq!(img.pixel(4, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_glyph_clips() {
        let mut img = RasterImage::new(4, 4);
        img.draw_glyph(&mask(3, 3, 255), -1, 2, Rgba::WHITE);
        assert_eq!(img.opaque_bounds(), Some((0, 0, 2, 2)));
        img.draw_glyph(&mask(3, 3, 255), 100, 100, Rgba::WHITE);
        assert_eq!(img.opaque_count(), 4);
    }

    #[test]
    fn test_draw_glyph_partial_coverage() {
        let mut img = RasterImage::new(1, 1);
        img.draw_glyph(&mask(1, 1, 51), 0, 1, Rgba::WHITE);
        assert_eq!(img.pixel(0, 0), Some(Rgba::new(255, 255, 255, 51)));
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let mut img = RasterImage::new(3, 2);
        img.set_pixel(1, 1, Rgba::WHITE);
        let png = img.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_png_rejects_empty() {
        let img = RasterImage::new(0, 10);
        assert!(matches!(img.to_png(), Err(RasterError::Empty(0, 10))));
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        RasterImage::new(2, 2).save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
