//! Pipeline configuration.
//!
//! The processing switches (stock vs enhanced, contrast vs S-curve) are
//! modeled as sum types so that invalid combinations cannot be
//! constructed: stock mode carries no adjustment parameters at all, and an
//! enhanced configuration holds exactly one tone-mapping operator.

use crate::palette::{MatchMethod, Palette};
use crate::tone::ToneCurve;

/// Tone-mapping operator for enhanced mode. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneMapping {
    /// Linear contrast around the 128 midpoint.
    Contrast(f32),
    /// Two-segment power-law S-curve.
    SCurve(ToneCurve),
}

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// The panel vendor's stock algorithm: no color adjustment, no tone
    /// mapping, RGB matching against the theoretical palette.
    Stock,
    /// The full pipeline: exposure, saturation, one tone-mapping
    /// operator, then dithering against the measured palette with a
    /// configurable metric.
    Enhanced {
        /// Linear exposure multiplier; 1.0 is neutral.
        exposure: f32,
        /// HSL saturation multiplier; 1.0 is neutral.
        saturation: f32,
        /// The one tone-mapping operator to apply.
        tone: ToneMapping,
        /// Palette matching metric for the ditherer.
        match_method: MatchMethod,
    },
}

impl Mode {
    /// Enhanced mode with the panel-tuned defaults: neutral exposure,
    /// saturation 1.3, default S-curve, RGB matching.
    pub fn enhanced_defaults() -> Self {
        Mode::Enhanced {
            exposure: 1.0,
            saturation: 1.3,
            tone: ToneMapping::SCurve(ToneCurve::default()),
            match_method: MatchMethod::Rgb,
        }
    }
}

/// Complete parameter set for one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessParams {
    /// Processing mode and its parameters.
    pub mode: Mode,
    /// When set, paint the measured (or custom device) colors into the
    /// output instead of the theoretical ones. Produces an accurate
    /// preview of what the glass will show; leave unset for device BMP
    /// export.
    pub render_measured: bool,
    /// Caller-supplied panel calibration standing in for the built-in
    /// measured palette.
    pub device_palette: Option<Palette>,
}

impl Default for ProcessParams {
    /// Firmware defaults: enhanced mode, measured-color rendering on.
    fn default() -> Self {
        Self {
            mode: Mode::enhanced_defaults(),
            render_measured: true,
            device_palette: None,
        }
    }
}

impl ProcessParams {
    /// Parameters for the given mode, with rendering defaults.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set whether output pixels use measured colors.
    pub fn render_measured(mut self, enabled: bool) -> Self {
        self.render_measured = enabled;
        self
    }

    /// Substitute a custom device calibration for the measured palette.
    pub fn device_palette(mut self, palette: Palette) -> Self {
        self.device_palette = Some(palette);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_firmware() {
        let params = ProcessParams::default();
        assert!(params.render_measured);
        assert!(params.device_palette.is_none());
        match params.mode {
            Mode::Enhanced {
                exposure,
                saturation,
                tone,
                match_method,
            } => {
                assert_eq!(exposure, 1.0);
                assert_eq!(saturation, 1.3);
                assert_eq!(match_method, MatchMethod::Rgb);
                assert!(matches!(tone, ToneMapping::SCurve(_)));
            }
            Mode::Stock => panic!("default mode should be enhanced"),
        }
    }

    #[test]
    fn test_builder_chain() {
        let params = ProcessParams::new(Mode::Stock).render_measured(false);
        assert_eq!(params.mode, Mode::Stock);
        assert!(!params.render_measured);
    }

    #[test]
    fn test_stock_carries_no_adjustments() {
        // The sum type makes "stock with an S-curve" unrepresentable;
        // this test only documents the shape.
        let params = ProcessParams::new(Mode::Stock);
        assert!(matches!(params.mode, Mode::Stock));
    }
}
