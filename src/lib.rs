// src/lib.rs
//! wms_animator library: turns a WMS layer sampled along one parameter into an animated GIF.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ErrorCategory`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `Settings`, `AppConfig`, `PipelineConfig`, `ServiceConfig`
//! - **Domain types**: `AnimationRequest`, `FramesPerSecond`, `FrameSequence`, etc.
//! - **Tile retrieval**: `TileSource`, `WmsHttpClient`, `UrlGenerator`, `TileFetcher`
//! - **Decoration**: `Canvas`, `CanvasProvider`, `GlyphCanvasProvider`, `TextOverlay`
//! - **Assembly and delivery**: `encode_animation`, `write_animation`
//! - **Orchestration**: `WmsAnimator` and the pipeline capability traits
//! - **HTTP service**: `router`, `run`, `serve_until`

mod animator;
mod api;
mod config;
mod constants;
mod error;
mod output;
mod pipeline;
mod render;
pub mod service;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ErrorCategory, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    AppConfig, Command, CommandLineInput, MetadataSettings, PipelineConfig, ServerSettings,
    ServiceConfig, Settings, WmsSettings,
};

// --- Domain Types ---
pub use crate::types::{
    AnimationRequest, FetchTask, Frame, FrameDelay, FrameSequence, FramesPerSecond, OverlayText,
    Parameter,
};

// --- Tile Retrieval ---
pub use crate::api::{url_generator::parse_endpoint, TileFetcher, TileSource, UrlGenerator, WmsHttpClient};

// --- Decoration ---
pub use crate::render::{
    timestamp::{display_timestamp, parse_parameter_timestamp},
    Canvas, CanvasProvider, GlyphCanvas, GlyphCanvasProvider, OverlayStyle, RoundedRect, TextExtent,
    TextOverlay,
};

// --- Assembly and Delivery ---
pub use crate::output::{encode_animation, write_animation, GIF_CONTENT_TYPE, STDOUT_TARGET};

// --- Orchestration ---
pub use crate::animator::{AnimationOutput, WmsAnimator};
pub use crate::pipeline::{AnimationComposer, FrameSource};
