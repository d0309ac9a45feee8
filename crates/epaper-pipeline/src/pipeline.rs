//! Pipeline orchestration.
//!
//! Pure sequencing over a normalized buffer; no state survives a call.
//! Geometry normalization happens before this entry point (the caller
//! owns the target dimensions and orientation policy), so the only
//! checked precondition here is buffer consistency.

use crate::adjust;
use crate::buffer::PixelBuffer;
use crate::dither;
use crate::error::PipelineError;
use crate::palette::{MatchMethod, Palette};
use crate::params::{Mode, ProcessParams, ToneMapping};
use crate::tone;

/// Run the color pipeline over a geometry-normalized buffer, in place.
///
/// Stock mode skips all adjustment and tone mapping and dithers with the
/// theoretical palette as the error reference. Enhanced mode applies
/// exposure, saturation, and the configured tone operator, then dithers
/// with the measured (or caller-supplied) palette as the reference.
///
/// In both modes the *output* palette is the measured/custom one when
/// `render_measured` is set and the theoretical one otherwise. A custom
/// device palette never replaces the stock error reference; it only
/// affects which colors get painted.
///
/// # Errors
///
/// [`PipelineError::GeometryMismatch`] if the buffer's data length
/// disagrees with its dimensions. Every other input is accepted: numeric
/// parameters are clamped by the stages themselves.
pub fn process(buffer: &mut PixelBuffer, params: &ProcessParams) -> Result<(), PipelineError> {
    buffer.validate()?;

    let theoretical = Palette::theoretical();
    let measured: &Palette = params
        .device_palette
        .as_ref()
        .unwrap_or_else(|| Palette::measured());

    let output = if params.render_measured {
        measured
    } else {
        theoretical
    };

    match &params.mode {
        Mode::Stock => {
            dither::floyd_steinberg(buffer, MatchMethod::Rgb, output, theoretical);
        }
        Mode::Enhanced {
            exposure,
            saturation,
            tone: tone_mapping,
            match_method,
        } => {
            adjust::apply_exposure(buffer, *exposure);
            adjust::apply_saturation(buffer, *saturation);
            match tone_mapping {
                ToneMapping::Contrast(factor) => adjust::apply_contrast(buffer, *factor),
                ToneMapping::SCurve(curve) => tone::apply_s_curve(buffer, curve),
            }
            dither::floyd_steinberg(buffer, *match_method, output, measured);
        }
    }

    Ok(())
}
