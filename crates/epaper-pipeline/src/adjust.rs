//! Per-pixel color adjustments: exposure, contrast, saturation.
//!
//! Each adjustment is an independent transform over the RGB channels with
//! its own output clamp, so any numeric factor is accepted. A factor of
//! exactly 1.0 is a no-op for all three.

use crate::buffer::PixelBuffer;

/// Multiply every RGB channel by `factor`, clamping at 255.
pub fn apply_exposure(buffer: &mut PixelBuffer, factor: f32) {
    if factor == 1.0 {
        return;
    }
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        for v in px.iter_mut().take(3) {
            *v = (*v as f32 * factor).round().min(255.0).max(0.0) as u8;
        }
    }
}

/// Scale every RGB channel away from the 128 midpoint by `factor`.
///
/// `clamp((v - 128) * factor + 128, 0, 255)` per channel.
pub fn apply_contrast(buffer: &mut PixelBuffer, factor: f32) {
    if factor == 1.0 {
        return;
    }
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        for v in px.iter_mut().take(3) {
            *v = ((*v as f32 - 128.0) * factor + 128.0)
                .round()
                .clamp(0.0, 255.0) as u8;
        }
    }
}

/// Scale saturation by `factor` through an HSL round trip.
///
/// The new saturation is clamped to [0, 1] before converting back.
/// Achromatic pixels (max channel == min channel) are left untouched:
/// the hue formula is undefined there, so the bypass is an exact
/// identity, not an approximation.
pub fn apply_saturation(buffer: &mut PixelBuffer, factor: f32) {
    if factor == 1.0 {
        return;
    }
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        let (r, g, b) = (px[0], px[1], px[2]);
        if let Some(rgb) = saturate_pixel(r, g, b, factor) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
        }
    }
}

/// Saturation adjustment for one pixel; `None` means achromatic bypass.
fn saturate_pixel(r: u8, g: u8, b: u8, factor: f32) -> Option<[u8; 3]> {
    if r == g && g == b {
        return None;
    }

    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let l = (max + min) / 2.0;
    let d = max - min;

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    // Hue in [0, 1), sector order r > g > b on ties
    let h = if max == rf {
        ((gf - bf) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == gf {
        ((bf - rf) / d + 2.0) / 6.0
    } else {
        ((rf - gf) / d + 4.0) / 6.0
    };

    let new_s = (s * factor).clamp(0.0, 1.0);

    // HSL -> RGB via chroma decomposition
    let c = (1.0 - (2.0 * l - 1.0).abs()) * new_s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (rp, gp, bp) = match (h * 6.0).floor() as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Some([
        ((rp + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((gp + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((bp + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
