//! Whole-image rotation with re-framing.
//!
//! Rotation is clockwise (y axis points down) about the origin. The result is
//! translated so that the rotated bounding box starts at `(0, 0)`, and its
//! size is the rounded size of that box, so nothing is cropped.
//!
//! Two paths:
//!
//! - **Quarter turns** (0°, 90°, 180°, 270° after reduction mod 360): exact
//!   coordinate remapping, no interpolation.
//! - **Other angles**: inverse mapping with bilinear filtering on
//!   premultiplied colour, transparent outside the source.

use crate::raster::{RasterImage, Rgba};

/// Rotate `src` by `degrees` clockwise. Any integer angle is accepted.
pub fn rotate(src: &RasterImage, degrees: i32) -> RasterImage {
    let degrees = degrees.rem_euclid(360);
    match degrees {
        0 => src.clone(),
        90 | 180 | 270 => rotate_quarter(src, degrees),
        _ => rotate_bilinear(src, degrees as f64),
    }
}

/// Width and height of the re-framed image for a rotation of `degrees`.
pub fn rotated_size(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    let degrees = degrees.rem_euclid(360);
    match degrees {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        _ => {
            let frame = Frame::new(width, height, degrees as f64);
            (frame.width, frame.height)
        }
    }
}

fn rotate_quarter(src: &RasterImage, degrees: i32) -> RasterImage {
    let (w, h) = (src.width(), src.height());
    let (dw, dh) = if degrees == 180 { (w, h) } else { (h, w) };
    let mut dst = RasterImage::new(dw, dh);

    for dy in 0..dh {
        for dx in 0..dw {
            let (sx, sy) = match degrees {
                90 => (dy, h - 1 - dx),
                180 => (w - 1 - dx, h - 1 - dy),
                _ => (w - 1 - dy, dx),
            };
            if let Some(px) = src.pixel(sx, sy) {
                dst.set_pixel(dx, dy, px);
            }
        }
    }
    dst
}

/// Rotated bounding box of a `width`×`height` rectangle.
struct Frame {
    cos: f64,
    sin: f64,
    min_x: f64,
    min_y: f64,
    width: u32,
    height: u32,
}

impl Frame {
    fn new(width: u32, height: u32, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (width as f64, height as f64);
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in corners {
            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        // A degenerate source has nothing to show at any angle.
        let (fw, fh) = if width == 0 || height == 0 {
            (0, 0)
        } else {
            (
                (max_x - min_x).round().max(0.0) as u32,
                (max_y - min_y).round().max(0.0) as u32,
            )
        };

        Self {
            cos,
            sin,
            min_x,
            min_y,
            width: fw,
            height: fh,
        }
    }

    /// Map a destination pixel centre back into source coordinates.
    fn to_source(&self, dx: u32, dy: u32) -> (f64, f64) {
        let x = dx as f64 + 0.5 + self.min_x;
        let y = dy as f64 + 0.5 + self.min_y;
        (x * self.cos + y * self.sin, -x * self.sin + y * self.cos)
    }
}

fn rotate_bilinear(src: &RasterImage, degrees: f64) -> RasterImage {
    let frame = Frame::new(src.width(), src.height(), degrees);
    let mut dst = RasterImage::new(frame.width, frame.height);

    for dy in 0..frame.height {
        for dx in 0..frame.width {
            let (sx, sy) = frame.to_source(dx, dy);
            let px = sample_bilinear(src, sx - 0.5, sy - 0.5);
            if px.a != 0 {
                dst.set_pixel(dx, dy, px);
            }
        }
    }
    dst
}

/// Premultiplied bilinear sample at continuous pixel coordinates.
fn sample_bilinear(src: &RasterImage, x: f64, y: f64) -> Rgba {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let fetch = |x: i64, y: i64| -> [f64; 4] {
        if x < 0 || y < 0 {
            return [0.0; 4];
        }
        match src.pixel(x as u32, y as u32) {
            Some(p) => {
                let a = p.a as f64 / 255.0;
                [p.r as f64 * a, p.g as f64 * a, p.b as f64 * a, p.a as f64]
            }
            None => [0.0; 4],
        }
    };

    let taps = [
        (fetch(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (fetch(x0 + 1, y0), fx * (1.0 - fy)),
        (fetch(x0, y0 + 1), (1.0 - fx) * fy),
        (fetch(x0 + 1, y0 + 1), fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (px, weight) in taps {
        for (sum, c) in acc.iter_mut().zip(px) {
            *sum += c * weight;
        }
    }

    let a = acc[3].round().clamp(0.0, 255.0);
    if a == 0.0 {
        return Rgba::TRANSPARENT;
    }
    let unpremul = |c: f64| (c * 255.0 / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba::new(unpremul(acc[0]), unpremul(acc[1]), unpremul(acc[2]), a as u8)
}
