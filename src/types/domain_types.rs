// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::{DEFAULT_FRAMES_PER_SECOND, DELAY_UNITS_PER_SECOND};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback rate of an animation. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FramesPerSecond(u32);

impl FramesPerSecond {
    /// Create a frame rate, rejecting zero.
    pub fn new(fps: u32) -> Result<Self, ValidationError> {
        if fps == 0 {
            return Err(ValidationError::NonPositiveFrameRate(fps));
        }
        Ok(Self(fps))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Per-frame delay, `100 / fps` with integer division.
    ///
    /// Rates above 100 would divide down to zero; those are clamped to the
    /// shortest delay a GIF can express instead.
    pub fn frame_delay(&self) -> FrameDelay {
        FrameDelay((DELAY_UNITS_PER_SECOND / self.0).max(1))
    }
}

impl Default for FramesPerSecond {
    fn default() -> Self {
        Self(DEFAULT_FRAMES_PER_SECOND)
    }
}

impl<'de> Deserialize<'de> for FramesPerSecond {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fps = u32::deserialize(deserializer)?;
        FramesPerSecond::new(fps).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for FramesPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

/// Delay between frames, in hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameDelay(u32);

impl FrameDelay {
    pub fn centiseconds(&self) -> u32 {
        self.0
    }

    pub fn milliseconds(&self) -> u32 {
        self.0 * 10
    }
}

impl fmt::Display for FrameDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}cs", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fps_is_rejected() {
        assert_eq!(
            FramesPerSecond::new(0),
            Err(ValidationError::NonPositiveFrameRate(0))
        );
    }

    #[test]
    fn delay_uses_integer_division() {
        let delay = |fps| FramesPerSecond::new(fps).unwrap().frame_delay().centiseconds();
        assert_eq!(delay(3), 33);
        assert_eq!(delay(1), 100);
        assert_eq!(delay(7), 14);
        assert_eq!(delay(100), 1);
    }

    #[test]
    fn delay_never_drops_to_zero() {
        let fps = FramesPerSecond::new(240).unwrap();
        assert_eq!(fps.frame_delay().centiseconds(), 1);
        assert_eq!(fps.frame_delay().milliseconds(), 10);
    }

    #[test]
    fn deserialize_validates() {
        let fps: FramesPerSecond = serde_json::from_str("5").unwrap();
        assert_eq!(fps.get(), 5);
        assert!(serde_json::from_str::<FramesPerSecond>("0").is_err());
    }
}
