//! Display palettes and nearest-color matching.
//!
//! The target panel is a 7-slot color e-paper display. Slot 4 is reserved
//! by the controller and must never be emitted, which leaves six usable
//! colors: black, white, yellow, red, blue, green.
//!
//! Two palettes describe the same panel:
//!
//! - **Theoretical**: the pure RGB values nominally assigned to each slot.
//!   Used for on-screen preview and BMP export, where the consumer maps
//!   slot colors back to indices by exact value.
//! - **Measured**: the RGB values the physical panel actually shows when
//!   driven with each slot. Matching photographic content against these
//!   produces far more faithful output, because the error-diffusion stage
//!   then compensates for the panel's real (muted, shifted) inks.
//!
//! A caller-supplied calibration palette may stand in for the measured one
//! via [`Palette::from_colors`].
//!
//! Every palette precomputes its LAB table at construction; matching never
//! converts palette entries per pixel.

use std::sync::OnceLock;

use crate::color::{rgb_to_lab, Lab};

/// Number of slots in the display palette, including the reserved one.
pub const PALETTE_SIZE: usize = 7;

/// Controller-reserved slot. Skipped by matching, never emitted.
pub const RESERVED_INDEX: usize = 4;

/// White slot, used as the fallback when a comparison set is degenerate.
pub const WHITE_INDEX: usize = 1;

/// Distance metric used for nearest-color lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMethod {
    /// Squared Euclidean distance on raw RGB values. Fast, and what the
    /// panel vendor's stock algorithm uses.
    #[default]
    Rgb,
    /// deltaE in CIE LAB. Perceptually weighted; better hue decisions on
    /// photographic content at the cost of a LAB conversion per pixel.
    Lab,
}

/// A 7-slot display palette with a precomputed LAB table.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    rgb: [[u8; 3]; PALETTE_SIZE],
    lab: [Lab; PALETTE_SIZE],
}

static THEORETICAL: OnceLock<Palette> = OnceLock::new();
static MEASURED: OnceLock<Palette> = OnceLock::new();

impl Palette {
    /// Build a palette from seven RGB slots, computing the LAB table once.
    ///
    /// The entry at [`RESERVED_INDEX`] is carried for slot-number fidelity
    /// but never participates in matching.
    pub fn from_colors(colors: [[u8; 3]; PALETTE_SIZE]) -> Self {
        let mut lab = [Lab::default(); PALETTE_SIZE];
        for (slot, c) in colors.iter().enumerate() {
            lab[slot] = rgb_to_lab(c[0] as f32, c[1] as f32, c[2] as f32);
        }
        Self { rgb: colors, lab }
    }

    /// The idealized slot colors: pure black, white, yellow, red, blue,
    /// green. Used for preview and BMP export.
    pub fn theoretical() -> &'static Palette {
        THEORETICAL.get_or_init(|| {
            Palette::from_colors([
                [0, 0, 0],       // black
                [255, 255, 255], // white
                [255, 255, 0],   // yellow
                [255, 0, 0],     // red
                [0, 0, 0],       // reserved
                [0, 0, 255],     // blue
                [0, 255, 0],     // green
            ])
        })
    }

    /// The colors the panel actually displays, measured off the glass.
    /// Used as the error-diffusion reference for faithful output.
    pub fn measured() -> &'static Palette {
        MEASURED.get_or_init(|| {
            Palette::from_colors([
                [2, 2, 2],       // black
                [190, 190, 190], // white
                [205, 202, 0],   // yellow
                [135, 19, 0],    // red
                [0, 0, 0],       // reserved
                [5, 64, 158],    // blue
                [39, 102, 60],   // green
            ])
        })
    }

    /// RGB triple of a slot.
    #[inline]
    pub fn rgb(&self, slot: usize) -> [u8; 3] {
        self.rgb[slot]
    }

    /// Precomputed LAB value of a slot.
    #[inline]
    pub fn lab(&self, slot: usize) -> Lab {
        self.lab[slot]
    }

    /// Find the nearest usable slot to an (error-adjusted, so fractional)
    /// RGB value under the given metric.
    ///
    /// The reserved slot is unconditionally skipped. The search starts
    /// from white, so a degenerate comparison (all distances infinite)
    /// still yields a valid slot. Exactly one slot index is returned,
    /// never a blend.
    #[inline]
    pub fn nearest(&self, r: f32, g: f32, b: f32, method: MatchMethod) -> usize {
        match method {
            MatchMethod::Rgb => self.nearest_rgb(r, g, b),
            MatchMethod::Lab => self.nearest_lab(r, g, b),
        }
    }

    fn nearest_rgb(&self, r: f32, g: f32, b: f32) -> usize {
        let mut best = WHITE_INDEX;
        let mut best_dist = f32::INFINITY;

        for (slot, c) in self.rgb.iter().enumerate() {
            if slot == RESERVED_INDEX {
                continue;
            }
            let dr = r - c[0] as f32;
            let dg = g - c[1] as f32;
            let db = b - c[2] as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = slot;
            }
        }

        best
    }

    fn nearest_lab(&self, r: f32, g: f32, b: f32) -> usize {
        let input = rgb_to_lab(r, g, b);
        let mut best = WHITE_INDEX;
        let mut best_dist = f32::INFINITY;

        for slot in 0..PALETTE_SIZE {
            if slot == RESERVED_INDEX {
                continue;
            }
            let dist = input.delta_e(self.lab[slot]);
            if dist < best_dist {
                best_dist = dist;
                best = slot;
            }
        }

        best
    }
}
