// src/render/glyph_canvas.rs
//! Canvas implementation over an RGBA buffer with rusttype glyph rasterisation.

use super::{Canvas, CanvasProvider, RoundedRect, TextExtent};
use crate::error::AppError;
use image::{Rgba, RgbaImage};
use once_cell::sync::OnceCell;
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hands out [`GlyphCanvas`]es that share one lazily loaded font.
///
/// Construct one per request: the font is read from disk the first time a
/// canvas is needed and reused by every task after that.
pub struct GlyphCanvasProvider {
    font_path: PathBuf,
    scale: Scale,
    font: OnceCell<Arc<Font<'static>>>,
}

impl GlyphCanvasProvider {
    pub fn new(font_path: impl Into<PathBuf>, font_size: f32) -> Self {
        Self {
            font_path: font_path.into(),
            scale: Scale::uniform(font_size),
            font: OnceCell::new(),
        }
    }

    fn font(&self) -> Result<Arc<Font<'static>>, AppError> {
        self.font
            .get_or_try_init(|| load_font(&self.font_path).map(Arc::new))
            .cloned()
    }
}

impl CanvasProvider for GlyphCanvasProvider {
    fn canvas_for(&self, image: RgbaImage) -> Result<Box<dyn Canvas>, AppError> {
        let font = self.font()?;
        Ok(Box::new(GlyphCanvas {
            image,
            font,
            scale: self.scale,
        }))
    }
}

fn load_font(path: &Path) -> Result<Font<'static>, AppError> {
    log::debug!("Loading overlay font from {}", path.display());

    let data = std::fs::read(path).map_err(|e| AppError::FontUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Font::try_from_vec(data).ok_or_else(|| AppError::FontUnavailable {
        path: path.display().to_string(),
        reason: "not a TrueType or OpenType font".to_string(),
    })
}

/// An RGBA raster with a font attached.
pub struct GlyphCanvas {
    image: RgbaImage,
    font: Arc<Font<'static>>,
    scale: Scale,
}

impl Canvas for GlyphCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn measure_string(&self, text: &str) -> TextExtent {
        let v_metrics = self.font.v_metrics(self.scale);
        let width = self
            .font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);

        TextExtent {
            width,
            height: v_metrics.ascent - v_metrics.descent,
        }
    }

    fn fill_rounded_rectangle(&mut self, rect: RoundedRect, color: Rgba<u8>) {
        fill_rounded_rect(&mut self.image, rect, color);
    }

    fn draw_string(&mut self, text: &str, x: f32, y: f32, color: Rgba<u8>) {
        let (width, height) = self.image.dimensions();

        for glyph in self.font.layout(text, self.scale, point(x, y)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let image = &mut self.image;
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                blend(image.get_pixel_mut(px as u32, py as u32), color, coverage);
            });
        }
    }

    fn into_image(self: Box<Self>) -> RgbaImage {
        self.image
    }
}

/// Fills a rounded rectangle with source-over blending.
///
/// Corners are anti-aliased over one pixel; straight edges are sampled at
/// pixel centres. Pixels outside the image are ignored.
pub fn fill_rounded_rect(image: &mut RgbaImage, rect: RoundedRect, color: Rgba<u8>) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }

    let radius = rect.radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);

    let x_start = left.floor().max(0.0) as u32;
    let y_start = top.floor().max(0.0) as u32;
    let x_end = (right.ceil().max(0.0) as u32).min(image.width());
    let y_end = (bottom.ceil().max(0.0) as u32).min(image.height());

    for py in y_start..y_end {
        for px in x_start..x_end {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            if cx < left || cx > right || cy < top || cy > bottom {
                continue;
            }

            // Distance from the nearest corner centre; zero away from corners.
            let nearest_x = cx.clamp(left + radius, right - radius);
            let nearest_y = cy.clamp(top + radius, bottom - radius);
            let distance = ((cx - nearest_x).powi(2) + (cy - nearest_y).powi(2)).sqrt();
            let coverage = if radius > 0.0 {
                (radius - distance + 0.5).clamp(0.0, 1.0)
            } else {
                1.0
            };

            if coverage > 0.0 {
                blend(image.get_pixel_mut(px, py), color, coverage);
            }
        }
    }
}

fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = (color.0[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for channel in 0..3 {
        let mixed = color.0[channel] as f32 * alpha + dst.0[channel] as f32 * inv;
        dst.0[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let dst_alpha = dst.0[3] as f32 / 255.0;
    dst.0[3] = ((alpha + dst_alpha * inv) * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn white(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn fill_darkens_the_inside_only() {
        let mut image = white(20);
        let rect = RoundedRect {
            x: 5.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
            radius: 4.0,
        };
        fill_rounded_rect(&mut image, rect, Rgba([0, 0, 0, 100]));

        // 255 * (1 - 100/255) = 155
        assert_eq!(image.get_pixel(10, 10).0, [155, 155, 155, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(17, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rounded_corners_stay_untouched() {
        let mut image = white(20);
        let rect = RoundedRect {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 20.0,
            radius: 8.0,
        };
        fill_rounded_rect(&mut image, rect, Rgba([0, 0, 0, 255]));

        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(19, 19).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(10, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn rectangles_outside_the_image_are_clipped() {
        let mut image = white(8);
        let rect = RoundedRect {
            x: -4.0,
            y: 6.0,
            width: 40.0,
            height: 40.0,
            radius: 0.0,
        };
        fill_rounded_rect(&mut image, rect, Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 7).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn missing_font_is_a_font_error() {
        let provider = GlyphCanvasProvider::new("/nonexistent/font.ttf", 18.0);
        match provider.canvas_for(white(4)) {
            Err(AppError::FontUnavailable { path, .. }) => {
                assert_eq!(path, "/nonexistent/font.ttf")
            }
            Err(other) => panic!("expected FontUnavailable, got {:?}", other),
            Ok(_) => panic!("expected FontUnavailable, got a canvas"),
        }
    }

    #[test]
    fn garbage_font_file_is_a_font_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();

        let provider = GlyphCanvasProvider::new(file.path(), 18.0);
        assert!(matches!(
            provider.canvas_for(white(4)),
            Err(AppError::FontUnavailable { .. })
        ));
    }

    fn bundled_font() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts/DejaVuSans.ttf")
    }

    #[test]
    fn bundled_font_measures_text() {
        let provider = GlyphCanvasProvider::new(bundled_font(), 18.0);
        let canvas = provider.canvas_for(white(4)).unwrap();

        let short = canvas.measure_string("Rain");
        let long = canvas.measure_string("Rainfall over East Africa");
        assert!(short.width > 0.0);
        assert!(long.width > short.width);
        assert!(short.height > 10.0 && short.height < 30.0);
        assert_eq!(canvas.measure_string("").width, 0.0);
    }

    #[test]
    fn draw_string_paints_near_its_baseline() {
        let provider = GlyphCanvasProvider::new(bundled_font(), 18.0);
        let mut canvas = provider
            .canvas_for(RgbaImage::from_pixel(120, 40, Rgba([0, 0, 0, 255])))
            .unwrap();
        canvas.draw_string("Hi", 5.0, 30.0, Rgba([255, 255, 255, 255]));
        let image = canvas.into_image();

        let lit: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| x < 60 && y <= 31));
    }

    #[test]
    fn text_running_off_the_canvas_is_clipped() {
        let provider = GlyphCanvasProvider::new(bundled_font(), 18.0);
        let mut canvas = provider.canvas_for(white(10)).unwrap();
        canvas.draw_string("Attribution", -20.0, 5.0, Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.into_image().dimensions(), (10, 10));
    }
}
