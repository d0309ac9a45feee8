//! Request-scoped processing: one source image to one display-ready
//! buffer.
//!
//! Pure per invocation. The only shared inputs are the immutable palette
//! tables and a snapshot of the current settings, so concurrent requests
//! never contend on pipeline state; a failed render can simply be retried
//! by the caller.

use epaper_pipeline::{adjust, geometry, pipeline, tone};
use epaper_pipeline::{Mode, Palette, PipelineError, PixelBuffer, ToneMapping};

use crate::models::ProcessingSettings;

/// Default panel canvas.
pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = 480;

/// Produce a display-ready buffer from a decoded source.
///
/// Portrait sources are rotated 90 degrees clockwise so the served image
/// always fills the landscape canvas. When `dither` is false (JPEG
/// serving) the color adjustments and tone mapping still run, but the
/// output keeps continuous tone instead of being quantized.
pub fn render_for_display(
    source: &PixelBuffer,
    settings: &ProcessingSettings,
    device_palette: Option<&Palette>,
    target_w: u32,
    target_h: u32,
    dither: bool,
) -> Result<PixelBuffer, PipelineError> {
    let mut canvas = geometry::normalize(source, target_w, target_h, true);

    let params = settings.to_params(device_palette.cloned());
    if dither {
        pipeline::process(&mut canvas, &params)?;
    } else if let Mode::Enhanced {
        exposure,
        saturation,
        tone: tone_mapping,
        ..
    } = params.mode
    {
        canvas.validate()?;
        adjust::apply_exposure(&mut canvas, exposure);
        adjust::apply_saturation(&mut canvas, saturation);
        match tone_mapping {
            ToneMapping::Contrast(factor) => adjust::apply_contrast(&mut canvas, factor),
            ToneMapping::SCurve(curve) => tone::apply_s_curve(&mut canvas, &curve),
        }
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessingMode;
    use epaper_pipeline::{PALETTE_SIZE, RESERVED_INDEX};

    fn theoretical_colors() -> Vec<[u8; 3]> {
        let p = Palette::theoretical();
        (0..PALETTE_SIZE)
            .filter(|&s| s != RESERVED_INDEX)
            .map(|s| p.rgb(s))
            .collect()
    }

    #[test]
    fn test_dithered_render_is_quantized() {
        let source = PixelBuffer::filled(1024, 768, [131, 94, 201]);
        let settings = ProcessingSettings {
            render_measured: false,
            ..Default::default()
        };
        let out =
            render_for_display(&source, &settings, None, DISPLAY_WIDTH, DISPLAY_HEIGHT, true)
                .unwrap();

        assert_eq!((out.width(), out.height()), (800, 480));
        let allowed = theoretical_colors();
        for y in (0..480).step_by(23) {
            for x in (0..800).step_by(29) {
                assert!(allowed.contains(&out.rgb_at(x, y)));
            }
        }
    }

    #[test]
    fn test_undithered_render_keeps_continuous_tone() {
        let source = PixelBuffer::filled(1024, 768, [131, 94, 201]);
        let settings = ProcessingSettings::default();
        let out =
            render_for_display(&source, &settings, None, DISPLAY_WIDTH, DISPLAY_HEIGHT, false)
                .unwrap();

        assert_eq!((out.width(), out.height()), (800, 480));
        // A flat purple field stays purple-ish, not palette colors.
        let [r, g, b] = out.rgb_at(400, 240);
        let allowed = theoretical_colors();
        assert!(!allowed.contains(&[r, g, b]), "should not be quantized");
    }

    #[test]
    fn test_stock_undithered_is_resize_only() {
        let source = PixelBuffer::filled(800, 480, [55, 66, 77]);
        let settings = ProcessingSettings {
            processing_mode: ProcessingMode::Stock,
            ..Default::default()
        };
        let out =
            render_for_display(&source, &settings, None, DISPLAY_WIDTH, DISPLAY_HEIGHT, false)
                .unwrap();
        assert_eq!(out.rgb_at(100, 100), [55, 66, 77]);
    }

    #[test]
    fn test_portrait_source_rotated_to_landscape() {
        let source = PixelBuffer::filled(480, 800, [10, 130, 60]);
        let settings = ProcessingSettings::default();
        let out =
            render_for_display(&source, &settings, None, DISPLAY_WIDTH, DISPLAY_HEIGHT, true)
                .unwrap();
        assert_eq!((out.width(), out.height()), (800, 480));
    }

    #[test]
    fn test_custom_palette_used_for_preview() {
        let mut colors = [[0u8, 0, 0]; PALETTE_SIZE];
        colors[1] = [150, 150, 150];
        let custom = Palette::from_colors(colors);

        let source = PixelBuffer::filled(800, 480, [140, 140, 140]);
        let settings = ProcessingSettings::default(); // render_measured = true
        let out = render_for_display(
            &source,
            &settings,
            Some(&custom),
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
            true,
        )
        .unwrap();

        let mut seen_custom_white = false;
        for y in (0..480).step_by(19) {
            for x in (0..800).step_by(17) {
                if out.rgb_at(x, y) == [150, 150, 150] {
                    seen_custom_white = true;
                }
            }
        }
        assert!(seen_custom_white, "custom palette colors should be painted");
    }
}
