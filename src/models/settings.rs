//! Processing settings: the serializable face of the pipeline parameters.
//!
//! Settings travel three ways: loaded from an optional YAML file at
//! startup, overridden per-run by CLI flags, and read/replaced at runtime
//! through the gallery config API. The string-ish switch fields mirror
//! what the frame's web UI sends; [`ProcessingSettings::to_params`]
//! folds them into the pipeline's sum-typed configuration.

use std::path::Path;

use epaper_pipeline::palette::MatchMethod;
use epaper_pipeline::{Mode, Palette, ProcessParams, ToneCurve, ToneMapping};
use serde::{Deserialize, Serialize};

/// Which tone-mapping operator enhanced mode applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Two-segment S-curve (default).
    #[default]
    Scurve,
    /// Linear contrast around the midpoint.
    Contrast,
}

/// Palette matching metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMethod {
    /// Euclidean distance on raw RGB (default, matches the panel vendor).
    #[default]
    Rgb,
    /// Perceptual deltaE in CIE LAB.
    Lab,
}

/// Processing algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Full pipeline with adjustments and tone mapping (default).
    #[default]
    Enhanced,
    /// Panel vendor's stock algorithm: dither only.
    Stock,
}

/// Tunable image-processing parameters.
///
/// Defaults reproduce the frame firmware's factory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Linear exposure multiplier.
    pub exposure: f32,
    /// HSL saturation multiplier.
    pub saturation: f32,
    /// Tone operator used in enhanced mode.
    pub tone_mode: ToneMode,
    /// Contrast factor (used when `tone_mode` is `contrast`).
    pub contrast: f32,
    /// S-curve overall strength.
    pub strength: f32,
    /// S-curve shadow boost.
    pub shadow_boost: f32,
    /// S-curve highlight compression.
    pub highlight_compress: f32,
    /// S-curve pivot.
    pub midpoint: f32,
    /// Palette matching metric.
    pub color_method: ColorMethod,
    /// Paint measured (true) or theoretical (false) colors.
    pub render_measured: bool,
    /// Stock or enhanced processing.
    pub processing_mode: ProcessingMode,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            saturation: 1.3,
            tone_mode: ToneMode::Scurve,
            contrast: 1.0,
            strength: 0.9,
            shadow_boost: 0.0,
            highlight_compress: 1.5,
            midpoint: 0.5,
            color_method: ColorMethod::Rgb,
            render_measured: true,
            processing_mode: ProcessingMode::Enhanced,
        }
    }
}

impl ProcessingSettings {
    /// Load settings from a YAML file, falling back to defaults (with a
    /// warning) when the file is missing or malformed.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "Loaded processing settings");
                    settings
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    /// The tone curve described by the S-curve fields.
    pub fn tone_curve(&self) -> ToneCurve {
        ToneCurve {
            strength: self.strength,
            shadow_boost: self.shadow_boost,
            highlight_compress: self.highlight_compress,
            midpoint: self.midpoint,
        }
    }

    /// Fold the flat settings into pipeline parameters.
    pub fn to_params(&self, device_palette: Option<Palette>) -> ProcessParams {
        let mode = match self.processing_mode {
            ProcessingMode::Stock => Mode::Stock,
            ProcessingMode::Enhanced => Mode::Enhanced {
                exposure: self.exposure,
                saturation: self.saturation,
                tone: match self.tone_mode {
                    ToneMode::Contrast => ToneMapping::Contrast(self.contrast),
                    ToneMode::Scurve => ToneMapping::SCurve(self.tone_curve()),
                },
                match_method: match self.color_method {
                    ColorMethod::Rgb => MatchMethod::Rgb,
                    ColorMethod::Lab => MatchMethod::Lab,
                },
            },
        };

        let mut params = ProcessParams::new(mode).render_measured(self.render_measured);
        if let Some(palette) = device_palette {
            params = params.device_palette(palette);
        }
        params
    }
}

/// Parse a device calibration palette from seven comma-separated hex
/// colors, e.g. `"#000000,#BEBEBE,#CDCA00,#871300,#000000,#05409E,#27663C"`.
pub fn parse_palette_spec(spec: &str) -> anyhow::Result<Palette> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != epaper_pipeline::PALETTE_SIZE {
        anyhow::bail!(
            "palette spec needs exactly {} colors, got {}",
            epaper_pipeline::PALETTE_SIZE,
            parts.len()
        );
    }

    let mut colors = [[0u8; 3]; epaper_pipeline::PALETTE_SIZE];
    for (slot, part) in parts.iter().enumerate() {
        let hex = part.strip_prefix('#').unwrap_or(part);
        if hex.len() != 6 {
            anyhow::bail!("invalid hex color \"{part}\" (expected #RRGGBB)");
        }
        colors[slot] = [
            u8::from_str_radix(&hex[0..2], 16)?,
            u8::from_str_radix(&hex[2..4], 16)?,
            u8::from_str_radix(&hex[4..6], 16)?,
        ];
    }
    Ok(Palette::from_colors(colors))
}
