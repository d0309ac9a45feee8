pub mod settings;

pub use settings::{
    parse_palette_spec, ColorMethod, ProcessingMode, ProcessingSettings, ToneMode,
};
