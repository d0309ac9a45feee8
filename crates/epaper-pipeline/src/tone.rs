//! S-curve tone mapping.
//!
//! A two-segment power-law curve pivoting at a configurable midpoint:
//! shadows (below the midpoint) are lifted with an exponent below 1,
//! highlights (above it) are compressed with an exponent above 1. Both
//! exponents scale with the overall strength, so `strength = 0` is a full
//! bypass. The bypass is explicit rather than relying on the exponents
//! collapsing to 1, which keeps the midpoint boundary numerically stable.

use crate::buffer::PixelBuffer;

/// S-curve parameters.
///
/// Documented ranges: `strength` 0.0..=1.0, `shadow_boost` 0.0..=1.0,
/// `highlight_compress` 0.5..=3.0, `midpoint` 0.3..=0.7. Values outside
/// the ranges are not rejected; the per-channel clamp keeps the output in
/// bounds regardless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    /// Overall curve strength; 0.0 disables tone mapping entirely.
    pub strength: f32,
    /// How hard shadows are lifted (scales the shadow exponent down).
    pub shadow_boost: f32,
    /// How hard highlights are compressed (scales the highlight exponent up).
    pub highlight_compress: f32,
    /// Pivot point in normalized [0, 1] space.
    pub midpoint: f32,
}

impl Default for ToneCurve {
    /// Defaults tuned for the panel's limited dynamic range.
    fn default() -> Self {
        Self {
            strength: 0.9,
            shadow_boost: 0.0,
            highlight_compress: 1.5,
            midpoint: 0.5,
        }
    }
}

impl ToneCurve {
    /// Map one normalized channel value through the curve.
    ///
    /// The midpoint itself is a fixed point for every parameter
    /// combination: both segments evaluate to exactly `midpoint` there.
    #[inline]
    pub fn shape(&self, value: f32) -> f32 {
        let result = if value <= self.midpoint {
            let shadow = value / self.midpoint;
            shadow.powf(1.0 - self.strength * self.shadow_boost) * self.midpoint
        } else {
            let highlight = (value - self.midpoint) / (1.0 - self.midpoint);
            self.midpoint
                + highlight.powf(1.0 + self.strength * self.highlight_compress)
                    * (1.0 - self.midpoint)
        };
        result.clamp(0.0, 1.0)
    }
}

/// Apply the S-curve to every RGB channel of the buffer.
///
/// `strength == 0.0` returns immediately without touching any pixel.
pub fn apply_s_curve(buffer: &mut PixelBuffer, curve: &ToneCurve) {
    if curve.strength == 0.0 {
        return;
    }
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        for v in px.iter_mut().take(3) {
            *v = (curve.shape(*v as f32 / 255.0) * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_is_fixed_point() {
        // At the pivot both segments collapse to the midpoint exactly,
        // for any parameter combination.
        for strength in [0.1, 0.5, 0.9, 1.0] {
            for shadow in [0.0, 0.5, 1.0] {
                for highlight in [0.5, 1.5, 3.0] {
                    for midpoint in [0.3, 0.5, 0.7] {
                        let curve = ToneCurve {
                            strength,
                            shadow_boost: shadow,
                            highlight_compress: highlight,
                            midpoint,
                        };
                        assert_eq!(
                            curve.shape(midpoint),
                            midpoint,
                            "midpoint drifted for {:?}",
                            curve
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_endpoints_are_fixed() {
        let curve = ToneCurve::default();
        assert_eq!(curve.shape(0.0), 0.0);
        assert!((curve.shape(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_highlight_compression_pulls_down() {
        // With highlight_compress > 0 the exponent exceeds 1, so values
        // above the midpoint move toward it.
        let curve = ToneCurve {
            strength: 1.0,
            shadow_boost: 0.0,
            highlight_compress: 2.0,
            midpoint: 0.5,
        };
        let v = curve.shape(0.75);
        assert!(v < 0.75, "highlight not compressed: {}", v);
        assert!(v > 0.5, "highlight crossed the midpoint: {}", v);
    }

    #[test]
    fn test_shadow_boost_lifts() {
        let curve = ToneCurve {
            strength: 1.0,
            shadow_boost: 0.8,
            highlight_compress: 0.0,
            midpoint: 0.5,
        };
        let v = curve.shape(0.2);
        assert!(v > 0.2, "shadow not lifted: {}", v);
        assert!(v < 0.5, "shadow crossed the midpoint: {}", v);
    }

    #[test]
    fn test_zero_shadow_boost_keeps_shadows_linear() {
        // shadow exponent is 1 - strength*0 = 1: identity below midpoint.
        let curve = ToneCurve {
            strength: 0.9,
            shadow_boost: 0.0,
            highlight_compress: 1.5,
            midpoint: 0.5,
        };
        for v in [0.05, 0.2, 0.4] {
            assert!((curve.shape(v) - v).abs() < 1e-6, "shadow moved at {}", v);
        }
    }

    #[test]
    fn test_strength_zero_is_full_bypass() {
        let curve = ToneCurve {
            strength: 0.0,
            shadow_boost: 1.0,
            highlight_compress: 3.0,
            midpoint: 0.4,
        };
        let mut buf = PixelBuffer::filled(2, 1, [13, 77, 240]);
        let before = buf.clone();
        apply_s_curve(&mut buf, &curve);
        assert_eq!(buf, before, "strength 0 must not touch pixels");
    }

    #[test]
    fn test_buffer_application_rounds() {
        let curve = ToneCurve {
            strength: 1.0,
            shadow_boost: 0.0,
            highlight_compress: 1.0,
            midpoint: 0.5,
        };
        let mut buf = PixelBuffer::filled(1, 1, [191, 191, 191]);
        apply_s_curve(&mut buf, &curve);
        // 191/255 = 0.749: highlight = 0.498^2 * 0.5 + 0.5 = 0.624 -> 159
        let [r, _, _] = buf.rgb_at(0, 0);
        assert_eq!(r, 159);
    }

    #[test]
    fn test_monotonic_over_full_range() {
        let curve = ToneCurve::default();
        let mut prev = curve.shape(0.0);
        for i in 1..=255 {
            let v = curve.shape(i as f32 / 255.0);
            assert!(
                v >= prev,
                "curve not monotonic at {} ({} < {})",
                i,
                v,
                prev
            );
            prev = v;
        }
    }

    #[test]
    fn test_alpha_untouched() {
        let mut buf = PixelBuffer::new(1, 1, 4, vec![10, 200, 90, 7]).unwrap();
        apply_s_curve(&mut buf, &ToneCurve::default());
        assert_eq!(buf.data()[3], 7);
    }
}
