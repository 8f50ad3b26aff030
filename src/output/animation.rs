// src/output/animation.rs
//! Animated GIF assembly.

use crate::error::AppError;
use crate::types::FramesPerSecond;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

/// Media type of the assembled animation.
pub const GIF_CONTENT_TYPE: &str = "image/gif";

/// Encodes `frames`, in the given order, into a looping GIF.
///
/// Every frame shows for `fps.frame_delay()`. Each frame is reduced to its
/// own palette of at most 256 colours; `speed` trades quantization quality
/// (1) for encoding time (30).
pub fn encode_animation(
    frames: Vec<RgbaImage>,
    fps: FramesPerSecond,
    speed: i32,
) -> Result<Vec<u8>, AppError> {
    if frames.is_empty() {
        return Err(AppError::AssemblyFailed(
            "no frames to assemble".to_string(),
        ));
    }

    let delay = fps.frame_delay();
    let frame_count = frames.len();
    log::debug!(
        "Encoding {} frames at {} ({} per frame)",
        frame_count,
        fps,
        delay
    );

    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut buffer, speed.clamp(1, 30));
        encoder.set_repeat(Repeat::Infinite).map_err(assembly_failure)?;
        encoder
            .encode_frames(frames.into_iter().map(|image| {
                Frame::from_parts(
                    image,
                    0,
                    0,
                    Delay::from_numer_denom_ms(delay.milliseconds(), 1),
                )
            }))
            .map_err(assembly_failure)?;
        // The trailer is written when the encoder goes out of scope.
    }

    log::info!("Assembled {} frames into {} bytes", frame_count, buffer.len());
    Ok(buffer)
}

fn assembly_failure(err: image::ImageError) -> AppError {
    AppError::AssemblyFailed(err.to_string())
}
