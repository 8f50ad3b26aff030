// src/pipeline.rs
//! Pipeline capability traits: the two stages of turning a request into an animation.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::animator::AnimationOutput;
use crate::error::AppError;
use crate::types::{AnimationRequest, FrameSequence, FramesPerSecond};

/// Retrieves every decorated frame of a request, ordered by parameter value.
#[async_trait::async_trait]
pub trait FrameSource {
    async fn frames(&self, request: &AnimationRequest) -> Result<FrameSequence, AppError>;
}

/// Assembles an ordered frame sequence into one animation.
pub trait AnimationComposer {
    fn compose(&self, frames: FrameSequence, fps: FramesPerSecond) -> Result<AnimationOutput, AppError>;
}
