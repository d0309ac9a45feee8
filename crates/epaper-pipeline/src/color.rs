//! Color space conversions for perceptual palette matching.
//!
//! The matching path runs sRGB -> linear RGB -> XYZ -> CIE LAB and measures
//! distance as plain Euclidean deltaE in LAB. Each conversion follows the
//! standard definitions:
//!
//! - sRGB decode: IEC 61966-2-1 piecewise curve (linear segment below
//!   0.04045, gamma 2.4 above)
//! - linear RGB -> XYZ: the D65 sRGB matrix, scaled to the conventional
//!   0..100 range
//! - XYZ -> LAB: D65 white point normalization and the piecewise
//!   cube-root transform (threshold 0.008856)
//!
//! Channel inputs are `f32` in the 0..=255 range rather than `u8` because
//! the ditherer matches error-adjusted values that are fractional.

/// A color in CIE LAB space (D65 white point).
///
/// Euclidean distance in LAB approximates human-perceived color
/// difference, which is what makes it usable as a palette-matching metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, 0 (black) to 100 (white).
    pub l: f32,
    /// Green-red axis.
    pub a: f32,
    /// Blue-yellow axis.
    pub b: f32,
}

impl Lab {
    /// Perceptual distance to another LAB color (deltaE 1976).
    #[inline]
    pub fn delta_e(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// Decode one sRGB channel (0..=255) to linear light (0..=1).
#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    let v = v / 255.0;
    if v > 0.04045 {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

/// Convert sRGB channel values (0..=255) to XYZ (0..=100 range, D65).
pub fn rgb_to_xyz(r: f32, g: f32, b: f32) -> [f32; 3] {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

    [x * 100.0, y * 100.0, z * 100.0]
}

/// Convert XYZ (0..=100 range) to CIE LAB under the D65 white point.
pub fn xyz_to_lab(xyz: [f32; 3]) -> Lab {
    // D65 reference white
    let x = xyz[0] / 95.047;
    let y = xyz[1] / 100.000;
    let z = xyz[2] / 108.883;

    #[inline]
    fn f(t: f32) -> f32 {
        if t > 0.008856 {
            t.powf(1.0 / 3.0)
        } else {
            7.787 * t + 16.0 / 116.0
        }
    }

    let fx = f(x);
    let fy = f(y);
    let fz = f(z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert sRGB channel values (0..=255) directly to LAB.
#[inline]
pub fn rgb_to_lab(r: f32, g: f32, b: f32) -> Lab {
    xyz_to_lab(rgb_to_xyz(r, g, b))
}
