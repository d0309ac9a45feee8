//! Floyd-Steinberg error diffusion with split output and reference
//! palettes.
//!
//! The quantizer takes *two* palettes:
//!
//! - the **reference** (dither) palette decides which slot a pixel maps to
//!   and supplies the value the quantization error is measured against;
//! - the **output** palette supplies the RGB actually written to the
//!   buffer for that slot.
//!
//! They usually differ on purpose. Matching against the measured panel
//! colors while painting theoretical colors produces a file the device
//! understands whose dither pattern compensates for the panel's real inks;
//! swapping the roles produces an accurate on-screen preview. Collapsing
//! the two into one palette breaks that calibration contract.
//!
//! The scan is strictly sequential, row-major, top-to-bottom and
//! left-to-right. Every pixel's effective input includes error pushed
//! forward by its left, above, and above-adjacent neighbors, so the order
//! is load-bearing: no serpentine traversal, no reordering, no
//! parallelism.

use crate::buffer::PixelBuffer;
use crate::palette::{MatchMethod, Palette};

/// Floyd-Steinberg kernel: fractions of the quantization error pushed to
/// each unprocessed neighbor.
///
/// ```text
///        X   7/16
/// 3/16  5/16  1/16
/// ```
const WEIGHT_RIGHT: f32 = 7.0 / 16.0;
const WEIGHT_BELOW_LEFT: f32 = 3.0 / 16.0;
const WEIGHT_BELOW: f32 = 5.0 / 16.0;
const WEIGHT_BELOW_RIGHT: f32 = 1.0 / 16.0;

/// Quantize the buffer in place to palette slots.
///
/// For each pixel, in scan order:
///
/// 1. add the accumulated diffusion error to the original channel values
///    and clamp to [0, 255];
/// 2. match the clamped value against `reference` to pick a slot;
/// 3. write `output`'s RGB for that slot into the buffer;
/// 4. compute the error against `reference`'s RGB for the slot (never
///    `output`'s, or the diffusion would chase the wrong colors);
/// 5. diffuse the error to the right, below-left, below, and below-right
///    neighbors; neighbors outside the image are skipped, nothing wraps.
///
/// The error accumulator lives for exactly one call.
pub fn floyd_steinberg(
    buffer: &mut PixelBuffer,
    method: MatchMethod,
    output: &Palette,
    reference: &Palette,
) {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;

    let mut errors: Vec<[f32; 3]> = vec![[0.0; 3]; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let [r0, g0, b0] = buffer.rgb_at(x as u32, y as u32);
            let err = errors[idx];

            let r = (r0 as f32 + err[0]).clamp(0.0, 255.0);
            let g = (g0 as f32 + err[1]).clamp(0.0, 255.0);
            let b = (b0 as f32 + err[2]).clamp(0.0, 255.0);

            let slot = reference.nearest(r, g, b, method);
            buffer.set_rgb(x as u32, y as u32, output.rgb(slot));

            let [rr, rg, rb] = reference.rgb(slot);
            let err_r = r - rr as f32;
            let err_g = g - rg as f32;
            let err_b = b - rb as f32;

            let mut push = |nx: usize, ny: usize, weight: f32| {
                let n = ny * width + nx;
                errors[n][0] += err_r * weight;
                errors[n][1] += err_g * weight;
                errors[n][2] += err_b * weight;
            };

            if x + 1 < width {
                push(x + 1, y, WEIGHT_RIGHT);
            }
            if y + 1 < height {
                if x > 0 {
                    push(x - 1, y + 1, WEIGHT_BELOW_LEFT);
                }
                push(x, y + 1, WEIGHT_BELOW);
                if x + 1 < width {
                    push(x + 1, y + 1, WEIGHT_BELOW_RIGHT);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PALETTE_SIZE, RESERVED_INDEX};

    /// Two-color palette: white in slot 1, black everywhere else. The
    /// duplicate black slots can never win a comparison because slot 0 is
    /// scanned first and ties do not displace the current best.
    fn bw_palette() -> Palette {
        let mut colors = [[0u8, 0, 0]; PALETTE_SIZE];
        colors[1] = [255, 255, 255];
        Palette::from_colors(colors)
    }

    fn count_color(buffer: &PixelBuffer, rgb: [u8; 3]) -> usize {
        let mut n = 0;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if buffer.rgb_at(x, y) == rgb {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_solid_black_stays_black() {
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(8, 8, [0, 0, 0]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);
        assert_eq!(count_color(&buf, [0, 0, 0]), 64);
    }

    #[test]
    fn test_solid_white_stays_white() {
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(8, 8, [255, 255, 255]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);
        assert_eq!(count_color(&buf, [255, 255, 255]), 64);
    }

    #[test]
    fn test_mid_gray_ratio_tracks_interpolation() {
        // A uniform (128,128,128) field against black/white must dither
        // to a white share close to 128/255.
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(100, 100, [128, 128, 128]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);

        let white = count_color(&buf, [255, 255, 255]);
        let black = count_color(&buf, [0, 0, 0]);
        assert_eq!(white + black, 100 * 100, "only palette colors allowed");

        let white_ratio = white as f32 / 10_000.0;
        let expected = 128.0 / 255.0;
        assert!(
            (white_ratio - expected).abs() < 0.03,
            "white ratio {} too far from {}",
            white_ratio,
            expected
        );
    }

    #[test]
    fn test_quarter_gray_ratio() {
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(100, 100, [64, 64, 64]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);

        let white_ratio = count_color(&buf, [255, 255, 255]) as f32 / 10_000.0;
        let expected = 64.0 / 255.0;
        assert!(
            (white_ratio - expected).abs() < 0.03,
            "white ratio {} too far from {}",
            white_ratio,
            expected
        );
    }

    #[test]
    fn test_output_contains_only_output_palette_colors() {
        let output = Palette::theoretical();
        let reference = Palette::measured();
        let mut buf = PixelBuffer::filled(32, 32, [97, 143, 200]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, output, reference);

        for y in 0..32 {
            for x in 0..32 {
                let rgb = buf.rgb_at(x, y);
                let legal = (0..PALETTE_SIZE)
                    .filter(|&s| s != RESERVED_INDEX)
                    .any(|s| output.rgb(s) == rgb);
                assert!(legal, "pixel ({}, {}) has non-palette color {:?}", x, y, rgb);
            }
        }
    }

    #[test]
    fn test_error_measured_against_reference_not_output() {
        // Paint theoretical colors but diffuse against the measured
        // palette. The measured white is (190,190,190), so a field at
        // exactly that level should come out nearly all white: the
        // reference sees (almost) zero error even though the written
        // color is (255,255,255).
        let output = Palette::theoretical();
        let reference = Palette::measured();
        let mut buf = PixelBuffer::filled(50, 50, [190, 190, 190]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, output, reference);

        let white = count_color(&buf, [255, 255, 255]);
        assert!(
            white as f32 / 2500.0 > 0.95,
            "measured-white input should map almost entirely to the white \
             slot, got {}/2500",
            white
        );

        // Sanity check the contrast: diffusing against the output palette
        // instead would see a -65 error per channel and darken the field.
        let mut buf2 = PixelBuffer::filled(50, 50, [190, 190, 190]);
        floyd_steinberg(&mut buf2, MatchMethod::Rgb, output, output);
        let white2 = count_color(&buf2, [255, 255, 255]);
        assert!(
            white2 < white,
            "same-palette diffusion should produce fewer white pixels \
             ({} vs {})",
            white2,
            white
        );
    }

    #[test]
    fn test_reserved_slot_color_never_written() {
        // Drive with colors across the cube; the reserved slot's RGB can
        // only appear when it equals a usable slot's color, so use the
        // measured palette (reserved (0,0,0) vs black (2,2,2)).
        let p = Palette::measured();
        let mut buf = PixelBuffer::filled(40, 40, [30, 30, 30]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, p, p);
        assert_eq!(
            count_color(&buf, [0, 0, 0]),
            0,
            "reserved slot color leaked into the output"
        );
    }

    #[test]
    fn test_lab_method_stays_within_palette() {
        let p = Palette::measured();
        let mut buf = PixelBuffer::filled(16, 16, [180, 120, 40]);
        floyd_steinberg(&mut buf, MatchMethod::Lab, p, p);
        for y in 0..16 {
            for x in 0..16 {
                let rgb = buf.rgb_at(x, y);
                let legal = (0..PALETTE_SIZE)
                    .filter(|&s| s != RESERVED_INDEX)
                    .any(|s| p.rgb(s) == rgb);
                assert!(legal, "non-palette color {:?} via LAB matching", rgb);
            }
        }
    }

    #[test]
    fn test_single_pixel_image() {
        // Degenerate geometry: every neighbor is out of bounds.
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(1, 1, [200, 200, 200]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);
        assert_eq!(buf.rgb_at(0, 0), [255, 255, 255]);
    }

    #[test]
    fn test_single_row_diffuses_right_only() {
        // 1xN image exercises the right-neighbor path without any
        // below-row pushes.
        let p = bw_palette();
        let mut buf = PixelBuffer::filled(64, 1, [128, 128, 128]);
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);
        let white = count_color(&buf, [255, 255, 255]);
        assert!(white > 0 && white < 64, "1-row dither should mix colors");
    }

    #[test]
    fn test_deterministic() {
        let p = Palette::measured();
        let mut a = PixelBuffer::filled(20, 20, [90, 160, 220]);
        let mut b = a.clone();
        floyd_steinberg(&mut a, MatchMethod::Rgb, p, p);
        floyd_steinberg(&mut b, MatchMethod::Rgb, p, p);
        assert_eq!(a, b, "dithering must be deterministic");
    }

    #[test]
    fn test_alpha_channel_untouched() {
        let p = bw_palette();
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&[128, 128, 128, 77]);
        }
        let mut buf = PixelBuffer::new(2, 2, 4, data).unwrap();
        floyd_steinberg(&mut buf, MatchMethod::Rgb, &p, &p);
        for px in buf.data().chunks_exact(4) {
            assert_eq!(px[3], 77);
        }
    }
}
