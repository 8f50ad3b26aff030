// tests/common/mod.rs
//! Shared fixtures: in-process tiles, a fake tile source and a font-free canvas.

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;
use wms_animator::{
    AnimationRequest, AppError, Canvas, CanvasProvider, OverlayStyle, Parameter, RoundedRect,
    TextExtent, TextOverlay,
};

pub const TILE_WIDTH: u32 = 64;
pub const TILE_HEIGHT: u32 = 48;

/// Encodes a solid PNG tile of the given shade.
pub fn png_tile(shade: u8) -> Vec<u8> {
    let tile = RgbaImage::from_pixel(TILE_WIDTH, TILE_HEIGHT, Rgba([shade, 0, 255 - shade, 255]));
    let mut bytes = Cursor::new(Vec::new());
    tile.write_to(&mut bytes, ImageFormat::Png)
        .expect("PNG encoding of a test tile");
    bytes.into_inner()
}

/// `count` hourly ISO-8601 timestamps starting 2021-01-01T00:00Z.
pub fn hourly_timestamps(count: usize) -> Vec<String> {
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|hour| {
            (start + Duration::hours(hour as i64))
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string()
        })
        .collect()
}

pub fn animation_request(url: &str, values: Vec<String>) -> AnimationRequest {
    AnimationRequest {
        url: url.to_string(),
        parameter: Parameter {
            name: "time".to_string(),
            values,
        },
        wms_params: BTreeMap::from([
            ("service".to_string(), "WMS".to_string()),
            ("request".to_string(), "GetMap".to_string()),
            ("layers".to_string(), "rainfall".to_string()),
            ("format".to_string(), "image/png".to_string()),
        ]),
        title: "Rainfall".to_string(),
        attribution: "Test Data".to_string(),
        frames_per_second: None,
    }
}

/// Value of the varying `time` parameter in a tile URL.
pub fn time_of(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == "time")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// How the fake source answers a particular value.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Garbage,
}

/// In-memory tile source that records call counts and peak concurrency.
#[derive(Default)]
pub struct MemorySource {
    pub delay: std::time::Duration,
    pub replies: HashMap<String, Reply>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MemorySource {
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn reply(mut self, value: &str, reply: Reply) -> Self {
        self.replies.insert(value.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl wms_animator::TileSource for MemorySource {
    async fn fetch_tile(&self, url: &Url) -> Result<Vec<u8>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let value = time_of(url);
        let reply = self.replies.get(&value).cloned();
        if reply.is_none() && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Some(Reply::Status(status)) => Err(AppError::FetchFailed {
                url: url.to_string(),
                status: Some(status),
                reason: format!("server responded with {}", status),
            }),
            Some(Reply::Garbage) => Ok(b"<ServiceExceptionReport/>".to_vec()),
            None => {
                let shade = value.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
                Ok(png_tile(shade))
            }
        }
    }
}

/// Canvas that measures every string as empty and draws nothing.
pub struct BlankCanvas(RgbaImage);

impl Canvas for BlankCanvas {
    fn width(&self) -> u32 {
        self.0.width()
    }
    fn height(&self) -> u32 {
        self.0.height()
    }
    fn measure_string(&self, _text: &str) -> TextExtent {
        TextExtent {
            width: 0.0,
            height: 0.0,
        }
    }
    fn fill_rounded_rectangle(&mut self, _rect: RoundedRect, _color: Rgba<u8>) {}
    fn draw_string(&mut self, _text: &str, _x: f32, _y: f32, _color: Rgba<u8>) {}
    fn into_image(self: Box<Self>) -> RgbaImage {
        self.0
    }
}

pub struct BlankCanvases;

impl CanvasProvider for BlankCanvases {
    fn canvas_for(&self, image: RgbaImage) -> Result<Box<dyn Canvas>, AppError> {
        Ok(Box::new(BlankCanvas(image)))
    }
}

pub fn blank_overlay() -> TextOverlay {
    TextOverlay::new(Arc::new(BlankCanvases), OverlayStyle::default())
}
