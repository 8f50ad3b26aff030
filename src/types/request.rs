// src/types/request.rs
//! The animation request as it arrives on the wire.

use super::{FramesPerSecond, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A request to animate one WMS layer along a varying parameter.
///
/// Immutable once handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationRequest {
    /// Base endpoint of the tile service.
    pub url: String,
    /// The axis the animation runs along, usually `time`.
    pub parameter: Parameter,
    /// Query parameters shared by every frame (layers, bbox, size, ...).
    #[serde(default)]
    pub wms_params: BTreeMap<String, String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attribution: String,
    /// Playback rate; absent or zero means "use the configured default".
    #[serde(default)]
    pub frames_per_second: Option<u32>,
}

/// The varying query parameter and the values it takes, one per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<String>,
}

/// Text burned into every frame besides its timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayText {
    pub title: String,
    pub attribution: String,
}

impl AnimationRequest {
    /// Checks what the pipeline relies on but cannot check itself.
    ///
    /// Frames are keyed by parameter value, so values must be unique.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::EmptyField("url"));
        }
        if self.parameter.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("parameter.name"));
        }
        if self.parameter.values.is_empty() {
            return Err(ValidationError::NoParameterValues {
                name: self.parameter.name.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(self.parameter.values.len());
        for value in &self.parameter.values {
            if !seen.insert(value.as_str()) {
                return Err(ValidationError::DuplicateValue(value.clone()));
            }
        }

        Ok(())
    }

    /// Resolves the requested frame rate, falling back to `default` for 0/absent.
    pub fn resolve_fps(&self, default: FramesPerSecond) -> FramesPerSecond {
        self.frames_per_second
            .and_then(|fps| FramesPerSecond::new(fps).ok())
            .unwrap_or(default)
    }

    pub fn overlay_text(&self) -> OverlayText {
        OverlayText {
            title: self.title.clone(),
            attribution: self.attribution.clone(),
        }
    }

    /// Number of frames the request will produce.
    pub fn frame_count(&self) -> usize {
        self.parameter.values.len()
    }
}
