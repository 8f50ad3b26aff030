// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Most of them are only defaults: the configuration file
//! can override anything a deployment might reasonably want to tune.

// ---------------------------------------------------------------------------
// Pipeline boundaries
// ---------------------------------------------------------------------------

/// Upper bound on tile fetches running at the same time for one request.
///
/// A request with fewer values than this starts one worker per value.
pub const MAX_CONCURRENT_FETCHES: usize = 50;

/// Frame rate used when a request leaves `frames_per_second` unset or zero.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 3;

/// GIF delays are expressed in hundredths of a second.
pub const DELAY_UNITS_PER_SECOND: u32 = 100;

/// NeuQuant sampling speed for palette reduction (1 = best, 30 = fastest).
pub const DEFAULT_QUANTIZATION_SPEED: i32 = 10;

// ---------------------------------------------------------------------------
// Overlay geometry
// ---------------------------------------------------------------------------

/// Point size of all overlay text.
pub const OVERLAY_FONT_SIZE: f32 = 18.0;

/// Distance between the canvas edge and an overlay box.
pub const OVERLAY_TEXT_PADDING: f32 = 15.0;

/// Extra room around the measured text inside an overlay box.
pub const OVERLAY_BACKGROUND_PADDING: f32 = 10.0;

/// Corner radius of overlay boxes.
pub const OVERLAY_CORNER_RADIUS: f32 = 4.0;

/// Translucent black behind overlay text (RGBA).
pub const OVERLAY_BACKGROUND: [u8; 4] = [0, 0, 0, 100];

/// Overlay text colour (RGBA).
pub const OVERLAY_FOREGROUND: [u8; 4] = [255, 255, 255, 255];

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Layout for zone-less parameter values, interpreted as UTC.
pub const PARAMETER_TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Layout of the timestamp burned into each frame.
pub const DISPLAY_TIMESTAMP_LAYOUT: &str = "UTC %Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Stem of the configuration file name.
pub const APP_NAME: &str = "wms_animator";

/// Directories searched for `wms_animator.toml` when no file is given.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["./config", "/config", "/etc"];

/// Route that accepts animation requests, relative to the base path.
pub const ANIMATION_ROUTE: &str = "/wms";
