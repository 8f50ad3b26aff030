// src/output/mod.rs
//! Output handling: assembling frames into an animation and delivering it.
//!
//! Encoding is pure (frames in, bytes out); [`writer`] is the only place
//! that touches the filesystem.

mod animation;
mod writer;

// Re-export the public interface
pub use animation::{encode_animation, GIF_CONTENT_TYPE};
pub use writer::{write_animation, STDOUT_TARGET};
