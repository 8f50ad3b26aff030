// src/types/frames.rs
//! Units of work flowing through the pipeline and the frames they produce.

use super::OverlayText;
use image::RgbaImage;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// One fully-resolved tile request, bound to the value that produced it.
#[derive(Debug, Clone)]
pub struct FetchTask {
    pub url: Url,
    pub value: String,
    pub overlay: Arc<OverlayText>,
}

/// A decorated frame, keyed by its parameter value.
#[derive(Debug, Clone)]
pub struct Frame {
    pub value: String,
    pub image: RgbaImage,
}

/// Successful frames of one request, ordered by parameter value.
///
/// Keys sort in ascending lexicographic order of the value strings; for
/// ISO-8601 timestamps of a single layout that is chronological order.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: BTreeMap<String, RgbaImage>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame, returning the image it replaced if the value was seen before.
    pub fn insert(&mut self, frame: Frame) -> Option<RgbaImage> {
        self.frames.insert(frame.value, frame.image)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Parameter values in frame order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn get(&self, value: &str) -> Option<&RgbaImage> {
        self.frames.get(value)
    }

    /// Consumes the sequence, yielding images in frame order.
    pub fn into_images(self) -> Vec<RgbaImage> {
        self.frames.into_values().collect()
    }
}
