//! epaper-pipeline: color pipeline for 7-color e-paper photo frames
//!
//! This library turns arbitrary full-color photographs into buffers a
//! small-palette e-paper panel can display, while keeping as much
//! perceptual fidelity as the six usable inks allow.
//!
//! # Pipeline
//!
//! ```text
//! decoded photo (PixelBuffer, any size)
//!     |
//!     v
//! geometry::normalize      rotate portrait sources, cover-resize to the
//!     |                    panel canvas; dimensions are fixed from here on
//!     v
//! adjust::apply_exposure   per-pixel multiplies, clamp to 255
//! adjust::apply_saturation HSL round trip, achromatic pixels untouched
//!     |
//!     v
//! tone (one of)            adjust::apply_contrast around the 128 midpoint,
//!     |                    or tone::apply_s_curve (shadow lift +
//!     v                    highlight compression)
//! dither::floyd_steinberg  sequential error diffusion against a reference
//!     |                    palette, painting an output palette
//!     v
//! quantized buffer (every pixel one of the six usable slot colors)
//! ```
//!
//! [`pipeline::process`] sequences the color stages according to a
//! [`ProcessParams`] configuration; geometry normalization runs first,
//! driven by the caller, because the caller owns the target dimensions
//! and orientation policy.
//!
//! # Two palettes, one panel
//!
//! The same physical display is described by two [`Palette`] values: the
//! **theoretical** colors its slots nominally carry and the **measured**
//! colors the glass actually shows. The ditherer takes both an output and
//! a reference palette precisely so those roles can differ; see
//! [`dither`] for why collapsing them breaks calibration.
//!
//! # Quick start
//!
//! ```
//! use epaper_pipeline::{geometry, pipeline, PixelBuffer, ProcessParams};
//!
//! let photo = PixelBuffer::filled(1600, 1200, [140, 160, 90]);
//! let mut canvas = geometry::normalize(&photo, 800, 480, true);
//! pipeline::process(&mut canvas, &ProcessParams::default()).unwrap();
//! assert_eq!((canvas.width(), canvas.height()), (800, 480));
//! ```
//!
//! The pipeline is single-threaded and synchronous: one invocation owns
//! its buffer and scratch error accumulator exclusively, and palette
//! tables are immutable after construction, so independent invocations
//! may run concurrently on independent buffers without coordination.

pub mod adjust;
pub mod buffer;
pub mod color;
pub mod dither;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod params;
pub mod pipeline;
pub mod tone;


pub use buffer::PixelBuffer;
pub use error::PipelineError;
pub use palette::{MatchMethod, Palette, PALETTE_SIZE, RESERVED_INDEX, WHITE_INDEX};
pub use params::{Mode, ProcessParams, ToneMapping};
pub use pipeline::process;
pub use tone::ToneCurve;
