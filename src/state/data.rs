//! Value types shared between the store, the generator and the loader.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use image::{ImageFormat, ImageReader, RgbaImage};

/// Content fingerprint of a source file at the time its thumbnail was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// Modification time in nanoseconds relative to the Unix epoch
    pub modified_ns: i64,
    /// File size in bytes
    pub size: u64,
}

impl Fingerprint {
    pub fn of(metadata: &fs::Metadata) -> io::Result<Self> {
        let modified = metadata.modified()?;
        let modified_ns = match modified.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_nanos()).unwrap_or(i64::MAX),
        };
        Ok(Self {
            modified_ns,
            size: metadata.len(),
        })
    }
}

/// Lookup key for a cached thumbnail.
///
/// The same file at the same edge length always yields the same key, and
/// two files sharing a basename never collide because the full canonical
/// path is part of it. Editing or replacing a file changes its fingerprint,
/// so the old thumbnail is never served for the new content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub edge: u32,
    pub fingerprint: Fingerprint,
}

impl CacheKey {
    /// Build the key for `path` as it currently exists on disk.
    /// Fails if the file is gone or cannot be stat'ed.
    pub fn for_file(path: &Path, edge: u32) -> io::Result<Self> {
        let path = fs::canonicalize(path)?;
        let metadata = fs::metadata(&path)?;
        Ok(Self {
            fingerprint: Fingerprint::of(&metadata)?,
            path,
            edge,
        })
    }

    /// Canonical path as stored in the cache
    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// A stored thumbnail. Always PNG encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub png: Vec<u8>,
}

/// Thumbnail delivered to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// PNG encoded RGBA8 bitmap
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// True if served from the store rather than freshly generated
    pub cached: bool,
}

impl Thumbnail {
    /// Wrap PNG bytes, reading the dimensions from the header
    pub fn from_png(png: Vec<u8>, cached: bool) -> Option<Self> {
        let (width, height) = png_dimensions(&png)?;
        Some(Self {
            png,
            width,
            height,
            cached,
        })
    }

    /// Decode to pixels for display
    pub fn to_rgba(&self) -> image::ImageResult<RgbaImage> {
        Ok(image::load_from_memory_with_format(&self.png, ImageFormat::Png)?.to_rgba8())
    }
}

/// Width and height from a PNG header, or None if the blob is not a readable PNG
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
        .into_dimensions()
        .ok()
}
