use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ScanError, ScanWarning};

/// Raster formats the generic decoder handles (or at least recognises)
pub const RASTER_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "heic"];

/// Raw camera formats
pub const RAW_EXTS: &[&str] = &[
    "3fr", "ari", "arw", "bay", "cap", "cr2", "cr3", "crw", "dcr", "dcs", "dng", "drf", "eip",
    "erf", "fff", "gpr", "iiq", "k25", "kdc", "mdc", "mef", "mos", "mrw", "nef", "nrw", "orf",
    "pef", "ptx", "pxn", "r3d", "raf", "raw", "rwl", "rw2", "rwz", "sr2", "srf", "srw", "x3f",
    "hif",
];

fn lowercase_ext(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True if the path carries one of the recognised image extensions (any case)
pub fn is_supported(path: &Path) -> bool {
    lowercase_ext(path)
        .map(|ext| RASTER_EXTS.contains(&ext.as_str()) || RAW_EXTS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_raw(path: &Path) -> bool {
    lowercase_ext(path)
        .map(|ext| RAW_EXTS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Recursive image finder rooted at one directory.
///
/// Every call to [`FileScanner::iter`] starts a fresh walk, so the same
/// scanner can be reused after the folder changes on disk.
#[derive(Debug, Clone)]
pub struct FileScanner {
    root: PathBuf,
    follow_links: bool,
}

/// Result of a complete scan: the images found and any directories skipped
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub paths: Vec<PathBuf>,
    pub warnings: Vec<ScanWarning>,
}

impl FileScanner {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot(root));
        }
        Ok(Self {
            root,
            follow_links: false,
        })
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree, yielding supported files in traversal order.
    /// Entries within a directory are visited by file name.
    pub fn iter(&self) -> ScanIter {
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter();
        ScanIter {
            walker,
            warnings: Vec::new(),
        }
    }

    /// Walk the whole tree and collect paths together with the warnings
    pub fn scan(&self) -> ScanOutcome {
        let mut iter = self.iter();
        let paths: Vec<PathBuf> = iter.by_ref().collect();
        let warnings = iter.take_warnings();

        log::info!(
            "Scanned {}: {} images, {} skipped entries",
            self.root.display(),
            paths.len(),
            warnings.len()
        );

        ScanOutcome { paths, warnings }
    }
}

pub struct ScanIter {
    walker: walkdir::IntoIter,
    warnings: Vec<ScanWarning>,
}

impl ScanIter {
    /// Warnings accumulated so far
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        std::mem::take(&mut self.warnings)
    }
}

impl Iterator for ScanIter {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_file() && !(entry.path_is_symlink() && entry.path().is_file()) {
                        continue;
                    }
                    if is_supported(entry.path()) {
                        return Some(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_default();
                    let permission_denied = err
                        .io_error()
                        .map(|e| e.kind() == ErrorKind::PermissionDenied)
                        .unwrap_or(false);
                    log::warn!("Skipping {}: {}", path.display(), err);
                    self.warnings.push(ScanWarning {
                        path,
                        reason: err.to_string(),
                        permission_denied,
                    });
                }
            }
        }
    }
}
