// src/render/mod.rs
//! Frame decoration: burning title, timestamp and attribution into tiles.
//!
//! The decorator only depends on the drawing capability described by
//! [`Canvas`]; how glyphs and shapes reach the pixels is up to the
//! [`CanvasProvider`] handed to the pipeline.

mod glyph_canvas;
mod overlay;
pub mod timestamp;

use crate::error::AppError;
use image::{Rgba, RgbaImage};

pub use glyph_canvas::{GlyphCanvas, GlyphCanvasProvider};
pub use overlay::{OverlayStyle, TextOverlay};

/// Axis-aligned box with rounded corners, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

/// Extent of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// A raster that text and shapes can be drawn onto.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Size `text` would occupy with the canvas font.
    fn measure_string(&self, text: &str) -> TextExtent;

    fn fill_rounded_rectangle(&mut self, rect: RoundedRect, color: Rgba<u8>);

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_string(&mut self, text: &str, x: f32, y: f32, color: Rgba<u8>);

    /// Exports the finished raster.
    fn into_image(self: Box<Self>) -> RgbaImage;
}

/// The ability to load the overlay font and wrap a raster in a [`Canvas`].
pub trait CanvasProvider: Send + Sync {
    fn canvas_for(&self, image: RgbaImage) -> Result<Box<dyn Canvas>, AppError>;
}
