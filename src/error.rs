//! Typed errors for every engine component.
//!
//! Soft errors (`ScanWarning`, metadata fallback) never abort a batch.
//! Only failing to open the thumbnail store is fatal to the engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A directory or entry skipped during a scan. The scan carries on.
#[derive(Debug, Error)]
#[error("skipped {path:?} while scanning: {reason}")]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
    pub permission_denied: bool,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist or is not a directory: {0:?}")]
    InvalidRoot(PathBuf),
}

/// Metadata extraction only fails when the file itself cannot be stat'ed.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("cannot read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0:?} is empty")]
    Empty(PathBuf),

    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no decodable preview in {0:?}")]
    Unsupported(PathBuf),

    #[error("cannot encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    #[error("thumbnail edge length must be positive")]
    ZeroEdge,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("thumbnail store is closed")]
    Closed,

    #[error("thumbnail database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot prepare cache directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a single unit of loader work that did not yield a thumbnail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source file unavailable {path:?}: {source}")]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("thumbnail generation timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("thumbnail worker panicked")]
    WorkerPanicked,
}

#[derive(Debug, Error)]
#[error("cannot delete {path:?}: {source}")]
pub struct DeleteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that are fatal to the engine as a whole.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot open thumbnail store: {0}")]
    StoreInit(#[source] StoreError),

    #[error("cannot start worker pool: {0}")]
    Runtime(#[source] io::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Store(StoreError),
}
