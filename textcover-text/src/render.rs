//! Text-to-image rendering.
//!
//! Layout is deliberately simple and fixed:
//!
//! - one line per `'\n'`, bold sans-serif at the configured size,
//! - canvas width = widest advance, canvas height =
//!   `size * n + LINE_SPACE * (n - 1) + LINE_SPACE`,
//! - first baseline at [`FIRST_BASELINE`], then `size + LINE_SPACE` per line,
//! - optional per-line centering on the rendered bounding box,
//! - the finished canvas is rotated as a whole (see [`crate::rotate`]).
//!
//! `LINE_SPACE` and `FIRST_BASELINE` are empirical values tuned for the
//! default 200 px size, not derived from font metrics. At much smaller
//! sizes later lines can fall below the canvas and get clipped.

use thiserror::Error;

use crate::engine::{ShapedLine, TextEngine};
use crate::raster::{RasterImage, Rgba};
use crate::rotate::{rotate, rotated_size};

/// Vertical gap between lines, in pixels.
pub const LINE_SPACE: f32 = 20.0;
/// Baseline of the first line, in pixels from the top of the canvas.
pub const FIRST_BASELINE: i32 = 170;
/// Text size used by the widget.
pub const DEFAULT_TEXT_SIZE: f32 = 200.0;
/// Largest width or height (before and after rotation) the renderer will allocate.
pub const MAX_DIMENSION: u32 = 16384;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Text size must be a positive number, got {0}")]
    InvalidTextSize(f32),
    #[error("Image of {width}x{height} exceeds the {limit}px limit", limit = MAX_DIMENSION)]
    TooLarge { width: u64, height: u64 },
    #[error("No font faces available for text rendering")]
    NoFonts,
}

/// Per-call rendering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Font size in pixels.
    pub text_size: f32,
    /// Clockwise rotation applied to the finished image.
    pub rotation_degrees: i32,
    /// Center each line horizontally within the canvas.
    pub center_text: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            text_size: DEFAULT_TEXT_SIZE,
            rotation_degrees: 0,
            center_text: true,
        }
    }
}

impl RenderConfig {
    pub fn new(text_size: f32, rotation_degrees: i32, center_text: bool) -> Self {
        Self {
            text_size,
            rotation_degrees,
            center_text,
        }
    }
}

/// Input text split into lines.
///
/// Trailing empty lines are dropped, but there is always at least one line,
/// so `""` and `"\n"` both give a single empty line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock<'a> {
    lines: Vec<&'a str>,
}

impl<'a> TextBlock<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        while lines.len() > 1 && lines.last() == Some(&"") {
            lines.pop();
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Canvas height for this block before rotation.
    pub fn canvas_height(&self, text_size: f32) -> f32 {
        let n = self.lines.len() as f32;
        text_size * n + LINE_SPACE * (n - 1.0) + LINE_SPACE
    }
}

/// Where one line lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePlacement {
    /// Pen origin x.
    pub x: i32,
    /// Baseline y.
    pub baseline: i32,
    /// Advance width of the line.
    pub advance: f32,
    /// Width of the rendered bounding box.
    pub ink_width: i32,
}

/// A fully measured block, ready to draw.
#[derive(Clone, Debug)]
pub struct TextLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<(LinePlacement, ShapedLine)>,
}

impl TextLayout {
    pub fn placements(&self) -> impl Iterator<Item = &LinePlacement> {
        self.lines.iter().map(|(p, _)| p)
    }
}

fn check_size(width: f64, height: f64) -> Result<(), RenderError> {
    if width > MAX_DIMENSION as f64 || height > MAX_DIMENSION as f64 {
        return Err(RenderError::TooLarge {
            width: width as u64,
            height: height as u64,
        });
    }
    Ok(())
}

/// Measure and place every line of `text` without drawing anything.
///
/// Both the canvas and its rotated frame are checked against
/// [`MAX_DIMENSION`] before any glyph is rasterized.
pub fn layout(
    engine: &mut TextEngine,
    text: &str,
    config: &RenderConfig,
) -> Result<TextLayout, RenderError> {
    let size = config.text_size;
    if !size.is_finite() || size <= 0.0 {
        return Err(RenderError::InvalidTextSize(size));
    }

    let block = TextBlock::parse(text);
    let canvas_height = block.canvas_height(size);
    check_size(0.0, canvas_height as f64)?;

    if !block.is_empty() && engine.face_count() == 0 {
        return Err(RenderError::NoFonts);
    }

    // Size is checked on measured advances; glyphs are rasterized only after.
    let text_width = block
        .lines()
        .iter()
        .map(|line| engine.measure_text(line, size))
        .fold(0.0f32, f32::max);
    check_size(text_width as f64, canvas_height as f64)?;
    let (rw, rh) = rotated_size(
        text_width as u32,
        canvas_height as u32,
        config.rotation_degrees,
    );
    check_size(rw as f64, rh as f64)?;

    let shaped: Vec<ShapedLine> = block
        .lines()
        .iter()
        .map(|line| engine.shape_line(line, size))
        .collect();

    let width = text_width as u32;
    let height = canvas_height as u32;

    let mut lines = Vec::with_capacity(shaped.len());
    let mut baseline = FIRST_BASELINE;
    for line in shaped {
        let ink_width = line.ink_width();
        let x = if config.center_text {
            width as i32 / 2 - ink_width / 2
        } else {
            0
        };
        lines.push((
            LinePlacement {
                x,
                baseline,
                advance: line.advance,
                ink_width,
            },
            line,
        ));
        baseline = (baseline as f32 + size + LINE_SPACE) as i32;
    }

    log::debug!(
        "Laid out {} line(s) at {}px into {}x{}",
        lines.len(),
        size,
        width,
        height,
    );

    Ok(TextLayout {
        width,
        height,
        lines,
    })
}

/// Draw a measured layout in opaque white onto a fresh transparent canvas.
pub fn draw(layout: &TextLayout) -> RasterImage {
    let mut canvas = RasterImage::new(layout.width, layout.height);
    for (placement, line) in &layout.lines {
        for glyph in &line.glyphs {
            canvas.draw_glyph(glyph, placement.x, placement.baseline, Rgba::WHITE);
        }
    }
    canvas
}

/// Render `text` into a new image: layout, draw, then rotate.
///
/// Empty text yields a zero-width image rather than an error.
pub fn render(
    engine: &mut TextEngine,
    text: &str,
    config: &RenderConfig,
) -> Result<RasterImage, RenderError> {
    let layout = layout(engine, text, config)?;
    let canvas = draw(&layout);
    Ok(rotate(&canvas, config.rotation_degrees))
}
