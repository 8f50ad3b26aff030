// src/animator.rs
//! Orchestrates one animation: fetch and decorate every frame, then assemble.

use crate::api::{TileFetcher, TileSource};
use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::output::encode_animation;
use crate::pipeline::{AnimationComposer, FrameSource};
use crate::render::{CanvasProvider, GlyphCanvasProvider, TextOverlay};
use crate::types::{AnimationRequest, FrameDelay, FrameSequence, FramesPerSecond};
use std::sync::Arc;

/// The assembled animation and what went into it.
#[derive(Debug, Clone)]
pub struct AnimationOutput {
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub frame_delay: FrameDelay,
}

/// Turns animation requests into GIFs.
///
/// Holds no per-request state; every call to [`WmsAnimator::animate`] builds
/// its own canvas provider, so the overlay font is loaded at most once per
/// request and never shared across requests.
#[derive(Clone)]
pub struct WmsAnimator {
    source: Arc<dyn TileSource>,
    config: PipelineConfig,
    canvases: Option<Arc<dyn CanvasProvider>>,
}

impl WmsAnimator {
    pub fn new(source: Arc<dyn TileSource>, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            canvases: None,
        }
    }

    /// Draws overlays through `canvases` instead of a per-request glyph canvas.
    pub fn with_canvas_provider(mut self, canvases: Arc<dyn CanvasProvider>) -> Self {
        self.canvases = Some(canvases);
        self
    }

    /// Runs the whole pipeline for `request`.
    pub async fn animate(&self, request: &AnimationRequest) -> Result<AnimationOutput, AppError> {
        request.validate()?;
        let fps = request.resolve_fps(self.config.default_fps);

        log::info!(
            "Animating {} values of '{}' from {} at {}",
            request.frame_count(),
            request.parameter.name,
            request.url,
            fps
        );

        let frames = self.frames(request).await?;
        let composer = self.composer();
        tokio::task::spawn_blocking(move || composer.compose(frames, fps)).await?
    }

    fn composer(&self) -> GifComposer {
        GifComposer {
            speed: self.config.quantization_speed,
        }
    }

    fn fetcher(&self) -> TileFetcher {
        let canvases = match &self.canvases {
            Some(canvases) => Arc::clone(canvases),
            None => Arc::new(GlyphCanvasProvider::new(
                self.config.font_path.clone(),
                self.config.overlay.font_size,
            )),
        };
        let overlay = TextOverlay::new(canvases, self.config.overlay.clone());

        TileFetcher::new(Arc::clone(&self.source), overlay)
            .with_max_concurrency(self.config.max_concurrency)
    }
}

#[async_trait::async_trait]
impl FrameSource for WmsAnimator {
    async fn frames(&self, request: &AnimationRequest) -> Result<FrameSequence, AppError> {
        self.fetcher().fetch_frames(request).await
    }
}

impl AnimationComposer for WmsAnimator {
    fn compose(&self, frames: FrameSequence, fps: FramesPerSecond) -> Result<AnimationOutput, AppError> {
        self.composer().compose(frames, fps)
    }
}

/// Encoding half of the pipeline, movable onto the blocking pool.
struct GifComposer {
    speed: i32,
}

impl AnimationComposer for GifComposer {
    fn compose(&self, frames: FrameSequence, fps: FramesPerSecond) -> Result<AnimationOutput, AppError> {
        let frame_count = frames.len();
        let bytes = encode_animation(frames.into_images(), fps, self.speed)?;

        Ok(AnimationOutput {
            bytes,
            frame_count,
            frame_delay: fps.frame_delay(),
        })
    }
}
