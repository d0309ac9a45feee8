//! Image decode/encode at the pipeline boundary.
//!
//! Decoding (JPEG/PNG) and continuous-tone encoding go through the
//! `image` crate; the device BMP format is hand-assembled in [`bmp`].

pub mod bmp;

use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use epaper_pipeline::{PipelineError, PixelBuffer};
use image::codecs::jpeg::JpegEncoder;
use image::ImageFormat;
use thiserror::Error;

pub use bmp::encode_bmp;

/// Errors at the decode/encode boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("image decode/encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pixel buffer error: {0}")]
    Buffer(#[from] PipelineError),

    #[error("invalid serve format \"{0}\": must be one of jpg, png, bmp")]
    UnknownFormat(String),
}

/// Output format for served images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeFormat {
    /// Continuous-tone JPEG; the dithering stage is skipped.
    Jpg,
    /// Lossless PNG of the quantized output.
    Png,
    /// Device BMP (24-bit bottom-up BGR), the frame's native format.
    #[default]
    Bmp,
}

impl FromStr for ServeFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ServeFormat::Jpg),
            "png" => Ok(ServeFormat::Png),
            "bmp" => Ok(ServeFormat::Bmp),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ServeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ServeFormat::Jpg => "jpg",
            ServeFormat::Png => "png",
            ServeFormat::Bmp => "bmp",
        })
    }
}

impl ServeFormat {
    /// HTTP content type for the encoded bytes.
    pub fn content_type(self) -> &'static str {
        match self {
            ServeFormat::Jpg => "image/jpeg",
            ServeFormat::Png => "image/png",
            ServeFormat::Bmp => "image/bmp",
        }
    }

    /// Whether the pipeline should quantize before encoding. JPEG output
    /// keeps continuous tone; dithering it would only add noise the
    /// compressor then mangles.
    pub fn dithered(self) -> bool {
        !matches!(self, ServeFormat::Jpg)
    }
}

/// Decode a JPEG/PNG file into an RGB pixel buffer.
pub fn decode_file(path: &Path) -> Result<PixelBuffer, CodecError> {
    let img = image::open(path)?.into_rgb8();
    let (w, h) = img.dimensions();
    Ok(PixelBuffer::new(w, h, 3, img.into_raw())?)
}

/// Decode in-memory JPEG/PNG bytes into an RGB pixel buffer.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let img = image::load_from_memory(bytes)?.into_rgb8();
    let (w, h) = img.dimensions();
    Ok(PixelBuffer::new(w, h, 3, img.into_raw())?)
}

fn to_rgb_image(buffer: &PixelBuffer) -> image::RgbImage {
    let (w, h) = (buffer.width(), buffer.height());
    if buffer.channels() == 3 {
        image::RgbImage::from_raw(w, h, buffer.data().to_vec())
            .expect("buffer length matches dimensions")
    } else {
        let mut img = image::RgbImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.put_pixel(x, y, image::Rgb(buffer.rgb_at(x, y)));
            }
        }
        img
    }
}

/// Encode a buffer as PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let img = to_rgb_image(buffer);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Encode a buffer as JPEG at the given quality (1..=100).
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CodecError> {
    let img = to_rgb_image(buffer);
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    img.write_with_encoder(encoder)?;
    Ok(out)
}

/// Encode a buffer in the given serve format.
pub fn encode(buffer: &PixelBuffer, format: ServeFormat) -> Result<Vec<u8>, CodecError> {
    match format {
        ServeFormat::Jpg => encode_jpeg(buffer, 95),
        ServeFormat::Png => encode_png(buffer),
        ServeFormat::Bmp => Ok(encode_bmp(buffer)),
    }
}
