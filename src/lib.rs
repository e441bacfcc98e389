//! Image indexing and thumbnail cache engine for the SD card quick viewer.
//!
//! - `scan`: find images under a folder and work out their effective dates
//! - `state`: the persistent thumbnail store
//! - `raw`: thumbnail generation, including embedded raw previews
//! - `loader`: concurrent, supersedable thumbnail loading
//! - `engine`: the facade a browser UI talks to

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod raw;
pub mod scan;
pub mod state;

pub use config::EngineConfig;
pub use engine::{DeleteReport, Engine};
pub use error::{
    ConfigError, DeleteError, EngineError, GenerateError, LoadError, MetadataError, ScanError, ScanWarning,
    StoreError,
};
pub use loader::{ConcurrentLoader, LoadEvent, LoadRequest, LoadStream, LoaderOptions};
pub use raw::{Generator, ThumbnailGenerator};
pub use scan::{DateRange, FileScanner, ScanOutcome};
pub use state::{CacheEntry, CacheKey, Library, MemoryStore, Thumbnail, ThumbnailStore};
