//! Long-lived services shared across request handlers.

pub mod library;
pub mod processor;
pub mod thumbnail;

pub use library::{ImageEntry, ImageLibrary, UPLOAD_ALBUM};
pub use processor::{render_for_display, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use thumbnail::ThumbnailCache;
