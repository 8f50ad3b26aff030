// src/render/overlay.rs
//! Overlay layout: where the title, timestamp and attribution boxes go.

use super::timestamp::display_timestamp;
use super::{Canvas, CanvasProvider, RoundedRect};
use crate::constants::*;
use crate::error::AppError;
use crate::types::OverlayText;
use image::{Rgba, RgbaImage};
use serde::Deserialize;
use std::sync::Arc;

/// Geometry and colours of the overlay boxes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font_size: f32,
    /// Gap between the canvas edge and a box.
    pub text_padding: f32,
    /// Room around the text inside a box.
    pub background_padding: f32,
    pub corner_radius: f32,
    pub background: [u8; 4],
    pub foreground: [u8; 4],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: OVERLAY_FONT_SIZE,
            text_padding: OVERLAY_TEXT_PADDING,
            background_padding: OVERLAY_BACKGROUND_PADDING,
            corner_radius: OVERLAY_CORNER_RADIUS,
            background: OVERLAY_BACKGROUND,
            foreground: OVERLAY_FOREGROUND,
        }
    }
}

/// Burns overlay text into fetched tiles.
#[derive(Clone)]
pub struct TextOverlay {
    canvases: Arc<dyn CanvasProvider>,
    style: OverlayStyle,
}

impl TextOverlay {
    pub fn new(canvases: Arc<dyn CanvasProvider>, style: OverlayStyle) -> Self {
        Self { canvases, style }
    }

    /// Returns `image` with the overlay for parameter `value` drawn on it.
    ///
    /// Fails with `InvalidTimestamp` when `value` is not a timestamp and with
    /// `FontUnavailable` when the canvas font cannot be loaded.
    pub fn decorate(
        &self,
        image: RgbaImage,
        value: &str,
        text: &OverlayText,
    ) -> Result<RgbaImage, AppError> {
        let timestamp = display_timestamp(value)?;
        let mut canvas = self.canvases.canvas_for(image)?;

        if !text.title.is_empty() {
            self.draw_title(canvas.as_mut(), &text.title);
        }
        self.draw_timestamp(canvas.as_mut(), &timestamp);
        if !text.attribution.is_empty() {
            self.draw_attribution(canvas.as_mut(), &text.attribution);
        }

        Ok(canvas.into_image())
    }

    fn draw_title(&self, canvas: &mut dyn Canvas, title: &str) {
        let s = &self.style;
        let extent = canvas.measure_string(title);

        self.draw_box(
            canvas,
            s.text_padding,
            s.text_padding,
            extent.width,
            extent.height,
        );
        canvas.draw_string(
            title,
            s.text_padding + s.background_padding / 2.0,
            s.text_padding + extent.height / 2.0 + s.background_padding,
            Rgba(s.foreground),
        );
    }

    fn draw_timestamp(&self, canvas: &mut dyn Canvas, timestamp: &str) {
        let s = &self.style;
        let extent = canvas.measure_string(timestamp);
        let baseline = canvas.height() as f32 - s.text_padding;
        let left = canvas.width() as f32 - (extent.width + s.text_padding);

        self.draw_box(
            canvas,
            left,
            baseline - extent.height,
            extent.width,
            extent.height,
        );
        canvas.draw_string(
            timestamp,
            left + s.background_padding / 2.0,
            baseline + s.background_padding / 2.0,
            Rgba(s.foreground),
        );
    }

    fn draw_attribution(&self, canvas: &mut dyn Canvas, attribution: &str) {
        let s = &self.style;
        let extent = canvas.measure_string(attribution);
        let baseline = canvas.height() as f32 - s.text_padding;

        self.draw_box(
            canvas,
            s.text_padding,
            baseline - extent.height,
            extent.width,
            extent.height,
        );
        canvas.draw_string(
            attribution,
            s.text_padding + s.background_padding / 2.0,
            baseline + s.background_padding / 2.0,
            Rgba(s.foreground),
        );
    }

    fn draw_box(&self, canvas: &mut dyn Canvas, x: f32, y: f32, text_width: f32, text_height: f32) {
        let s = &self.style;
        canvas.fill_rounded_rectangle(
            RoundedRect {
                x,
                y,
                width: text_width + s.background_padding,
                height: text_height + s.background_padding,
                radius: s.corner_radius,
            },
            Rgba(s.background),
        );
    }
}
