//! Orientation-aware geometry normalization.
//!
//! The panel is a fixed landscape canvas, so every source photo is brought
//! to the exact target size before any color work happens:
//!
//! 1. Portrait sources (height > width) are optionally rotated 90
//!    degrees clockwise so the long edge lies along the panel's long edge.
//! 2. The image is cover-resized: scaled by
//!    `max(target_w / src_w, target_h / src_h)` with Lanczos3 resampling,
//!    then center-cropped to exactly the target size. The canvas is always
//!    fully filled; excess content is discarded, never letterboxed.
//!
//! Dimensions are fixed once normalization completes; no later pipeline
//! stage may resize the buffer.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use crate::buffer::PixelBuffer;

/// True when the buffer is taller than it is wide.
#[inline]
pub fn is_portrait(buffer: &PixelBuffer) -> bool {
    buffer.height() > buffer.width()
}

fn to_dynamic(buffer: &PixelBuffer) -> DynamicImage {
    let (w, h) = (buffer.width(), buffer.height());
    match buffer.channels() {
        4 => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(w, h, buffer.data().to_vec())
                .expect("buffer length matches dimensions"),
        ),
        _ => DynamicImage::ImageRgb8(
            RgbImage::from_raw(w, h, buffer.data().to_vec())
                .expect("buffer length matches dimensions"),
        ),
    }
}

fn from_dynamic(img: DynamicImage, channels: usize) -> PixelBuffer {
    match channels {
        4 => {
            let rgba = img.into_rgba8();
            let (w, h) = rgba.dimensions();
            PixelBuffer::new(w, h, 4, rgba.into_raw()).expect("image buffer is well-formed")
        }
        _ => {
            let rgb = img.into_rgb8();
            let (w, h) = rgb.dimensions();
            PixelBuffer::new(w, h, 3, rgb.into_raw()).expect("image buffer is well-formed")
        }
    }
}

/// Rotate a full 90 degrees clockwise. Output dimensions are the input's
/// swapped; this is a true rotation (transpose plus flip), not a crop.
pub fn rotate_90_cw(buffer: &PixelBuffer) -> PixelBuffer {
    let channels = buffer.channels();
    let rotated = match to_dynamic(buffer) {
        DynamicImage::ImageRgba8(img) => DynamicImage::ImageRgba8(imageops::rotate90(&img)),
        DynamicImage::ImageRgb8(img) => DynamicImage::ImageRgb8(imageops::rotate90(&img)),
        other => DynamicImage::ImageRgb8(imageops::rotate90(&other.into_rgb8())),
    };
    from_dynamic(rotated, channels)
}

/// Cover-mode resize: scale so the target canvas is fully filled, then
/// center-crop the overhang.
///
/// The scale factor is `max(target_w / src_w, target_h / src_h)`; scaled
/// dimensions round to the nearest pixel, and the crop offset on each axis
/// is `round((scaled - target) / 2)`. Output is exactly
/// `target_w x target_h` for any source size.
pub fn resize_cover(buffer: &PixelBuffer, target_w: u32, target_h: u32) -> PixelBuffer {
    let channels = buffer.channels();
    let (src_w, src_h) = (buffer.width(), buffer.height());

    let scale_x = target_w as f64 / src_w as f64;
    let scale_y = target_h as f64 / src_h as f64;
    let scale = scale_x.max(scale_y);

    let scaled_w = ((src_w as f64 * scale).round() as u32).max(target_w);
    let scaled_h = ((src_h as f64 * scale).round() as u32).max(target_h);

    let img = to_dynamic(buffer);
    let scaled = img.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);

    let crop_x = ((scaled_w - target_w) as f64 / 2.0).round() as u32;
    let crop_y = ((scaled_h - target_h) as f64 / 2.0).round() as u32;
    let cropped = scaled.crop_imm(crop_x, crop_y, target_w, target_h);

    from_dynamic(cropped, channels)
}

/// Bring a source buffer to the target canvas size.
///
/// When `rotate_portrait` is set and the source is portrait, it is rotated
/// 90 degrees clockwise first. A buffer already at the target size passes
/// through untouched.
pub fn normalize(
    buffer: &PixelBuffer,
    target_w: u32,
    target_h: u32,
    rotate_portrait: bool,
) -> PixelBuffer {
    let oriented = if rotate_portrait && is_portrait(buffer) {
        rotate_90_cw(buffer)
    } else {
        buffer.clone()
    };

    if oriented.width() == target_w && oriented.height() == target_h {
        return oriented;
    }
    resize_cover(&oriented, target_w, target_h)
}
