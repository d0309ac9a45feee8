//! Album library: filesystem scan, lookup, and gallery mutations.
//!
//! The library root contains one subdirectory per album; images are
//! `.jpg`/`.jpeg`/`.png` files inside them. Uploads land in a dedicated
//! `uploads` album. There is no metadata store: the filesystem is the
//! source of truth and mutations simply rescan it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rand::seq::SliceRandom;

/// Album name that receives gallery uploads.
pub const UPLOAD_ALBUM: &str = "uploads";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One image in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// File name, unique within the library (first hit wins on clashes).
    pub name: String,
    /// Album (subdirectory) the file lives in.
    pub album: String,
    /// Absolute path to the file.
    pub path: PathBuf,
}

/// Scanned album directory with interior mutability for rescans.
#[derive(Debug)]
pub struct ImageLibrary {
    root: PathBuf,
    entries: RwLock<Vec<ImageEntry>>,
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reject names that could escape the album directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

fn scan_root(root: &Path) -> io::Result<Vec<ImageEntry>> {
    let mut entries = Vec::new();

    let mut albums: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    albums.sort();

    for album_path in albums {
        let album = match album_path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let mut files: Vec<PathBuf> = fs::read_dir(&album_path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_image_file(p))
            .collect();
        files.sort();

        for path in files {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                entries.push(ImageEntry {
                    name: name.to_string(),
                    album: album.clone(),
                    path,
                });
            }
        }
    }

    Ok(entries)
}

impl ImageLibrary {
    /// Scan an album directory. An empty library is allowed (uploads can
    /// populate it later); callers decide whether that is fatal.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let entries = scan_root(root)?;
        tracing::info!(
            root = %root.display(),
            images = entries.len(),
            "Scanned album directory"
        );
        Ok(Self {
            root: root.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    /// Re-read the directory tree, replacing the entry list.
    pub fn rescan(&self) -> io::Result<usize> {
        let entries = scan_root(&self.root)?;
        let count = entries.len();
        *self.entries.write().expect("library lock poisoned") = entries;
        Ok(count)
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.entries.read().expect("library lock poisoned").len()
    }

    /// True when no images are present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct albums that contain at least one image.
    pub fn album_count(&self) -> usize {
        let entries = self.entries.read().expect("library lock poisoned");
        let mut albums: Vec<&str> = entries.iter().map(|e| e.album.as_str()).collect();
        albums.sort_unstable();
        albums.dedup();
        albums.len()
    }

    /// Snapshot of all entries.
    pub fn all(&self) -> Vec<ImageEntry> {
        self.entries.read().expect("library lock poisoned").clone()
    }

    /// A uniformly random entry, if any.
    pub fn random(&self) -> Option<ImageEntry> {
        self.entries
            .read()
            .expect("library lock poisoned")
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    /// Look an entry up by file name.
    pub fn find(&self, name: &str) -> Option<ImageEntry> {
        self.entries
            .read()
            .expect("library lock poisoned")
            .iter()
            .find(|e| e.name == name)
            .cloned()
    }

    /// Store uploaded bytes in the uploads album and rescan.
    pub fn add_upload(&self, name: &str, bytes: &[u8]) -> io::Result<ImageEntry> {
        if !is_safe_name(name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsafe file name: {name:?}"),
            ));
        }
        let album_dir = self.root.join(UPLOAD_ALBUM);
        fs::create_dir_all(&album_dir)?;
        let path = album_dir.join(name);
        fs::write(&path, bytes)?;
        self.rescan()?;
        tracing::info!(name, bytes = bytes.len(), "Stored upload");
        Ok(ImageEntry {
            name: name.to_string(),
            album: UPLOAD_ALBUM.to_string(),
            path,
        })
    }

    /// Delete an image by name and rescan. Returns the removed entry.
    pub fn remove(&self, name: &str) -> io::Result<Option<ImageEntry>> {
        if !is_safe_name(name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsafe file name: {name:?}"),
            ));
        }
        let Some(entry) = self.find(name) else {
            return Ok(None);
        };
        fs::remove_file(&entry.path)?;
        self.rescan()?;
        tracing::info!(name, album = %entry.album, "Deleted image");
        Ok(Some(entry))
    }
}
