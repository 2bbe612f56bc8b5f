//! # textcover-text
//!
//! Text rasterizer for the textcover widget. Turns a block of text into an
//! RGBA image: bold sans-serif glyphs shaped and rasterized via `cosmic-text`,
//! one line per `'\n'`, optionally centered per line, then rotated as a whole.
//!
//! ## Architecture
//!
//! ```text
//! TextEngine (cosmic-text FontSystem + SwashCache)
//!     │
//!     ▼
//! shape_line(str, size) ──► ShapedLine { advance, Vec<GlyphBitmap> }
//!     │
//!     ▼
//! render() ──► canvas (RasterImage) ──► rotate() ──► RasterImage
//! ```
//!
//! - **`engine`** — Font loading, shaping, glyph rasterization, measurement.
//! - **`raster`** — Owned RGBA pixel buffer, compositing, PNG encoding.
//! - **`rotate`** — Whole-image rotation with re-framing.
//! - **`render`** — The layout routine that ties the three together.

pub mod engine;
pub mod raster;
pub mod render;
pub mod rotate;

// Re-exports for ergonomic use.
pub use engine::{GlyphBitmap, GlyphContent, InkBounds, ShapedLine, TextEngine};
pub use raster::{RasterError, RasterImage, Rgba};
pub use render::{
    draw, layout, render, LinePlacement, RenderConfig, RenderError, TextBlock, TextLayout,
    DEFAULT_TEXT_SIZE, FIRST_BASELINE, LINE_SPACE, MAX_DIMENSION,
};
pub use rotate::{rotate, rotated_size};

// `TextEngine` exposes its font system publicly.
pub use cosmic_text;
