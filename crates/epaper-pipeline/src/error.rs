//! Error types for the pipeline.
//!
//! The pipeline is total over numeric parameter input: out-of-range
//! exposure, saturation, or tone-curve values are clamped by the stage
//! arithmetic, never rejected. The only fatal condition is a pixel buffer
//! whose byte length disagrees with its declared geometry.

use thiserror::Error;

/// Errors produced by pipeline entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Buffer length does not equal `width * height * channels`.
    #[error(
        "pixel buffer geometry mismatch: {width}x{height} with {channels} \
         channels requires {expected} bytes, got {actual}"
    )]
    GeometryMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    /// Channel count other than RGB or RGBA.
    #[error("unsupported channel count {channels}: need 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels { channels: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_mismatch_message() {
        let err = PipelineError::GeometryMismatch {
            width: 800,
            height: 480,
            channels: 3,
            expected: 1_152_000,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "pixel buffer geometry mismatch: 800x480 with 3 channels \
             requires 1152000 bytes, got 12"
        );
    }

    #[test]
    fn test_unsupported_channels_message() {
        let err = PipelineError::UnsupportedChannels { channels: 1 };
        assert_eq!(
            err.to_string(),
            "unsupported channel count 1: need 3 (RGB) or 4 (RGBA)"
        );
    }
}
