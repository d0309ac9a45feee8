//! Thumbnail generation and caching.
//!
//! Thumbnails are always derived from the *unprocessed* source image (the
//! gallery wants to show the photo, not the dither pattern) and keep the
//! source orientation: landscape sources get 400x240, portrait sources
//! 240x400, both cover-cropped. Generated JPEGs are cached in memory by
//! file name; uploads and deletes invalidate their entry.

use std::collections::HashMap;
use std::sync::Mutex;

use epaper_pipeline::geometry;

use crate::codec::{self, CodecError};
use crate::services::library::ImageEntry;

/// Landscape thumbnail canvas; portrait sources use the swapped size.
pub const THUMB_WIDTH: u32 = 400;
pub const THUMB_HEIGHT: u32 = 240;

const THUMB_JPEG_QUALITY: u8 = 80;

/// In-memory cache of encoded thumbnail JPEGs.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    cache: Mutex<HashMap<String, Vec<u8>>>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached thumbnail for an entry, generating it on miss.
    pub fn get_or_generate(&self, entry: &ImageEntry) -> Result<Vec<u8>, CodecError> {
        if let Some(bytes) = self
            .cache
            .lock()
            .expect("thumbnail lock poisoned")
            .get(&entry.name)
        {
            return Ok(bytes.clone());
        }

        let bytes = generate_thumbnail(entry)?;
        self.cache
            .lock()
            .expect("thumbnail lock poisoned")
            .insert(entry.name.clone(), bytes.clone());
        tracing::debug!(name = %entry.name, bytes = bytes.len(), "Generated thumbnail");
        Ok(bytes)
    }

    /// Whether a thumbnail for this name is cached.
    pub fn contains(&self, name: &str) -> bool {
        self.cache
            .lock()
            .expect("thumbnail lock poisoned")
            .contains_key(name)
    }

    /// Drop the cached thumbnail for a name (after delete or re-upload).
    pub fn invalidate(&self, name: &str) {
        self.cache
            .lock()
            .expect("thumbnail lock poisoned")
            .remove(name);
    }
}

fn generate_thumbnail(entry: &ImageEntry) -> Result<Vec<u8>, CodecError> {
    let source = codec::decode_file(&entry.path)?;

    // Keep the source orientation; never rotate thumbnails.
    let (w, h) = if geometry::is_portrait(&source) {
        (THUMB_HEIGHT, THUMB_WIDTH)
    } else {
        (THUMB_WIDTH, THUMB_HEIGHT)
    };

    let small = geometry::resize_cover(&source, w, h);
    codec::encode_jpeg(&small, THUMB_JPEG_QUALITY)
}
