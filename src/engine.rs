//! Engine facade tying the scanner, the store and the loader together.
//!
//! The store is opened once when the engine starts and closed on
//! [`Engine::close`]. Everything else is per request.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{DeleteError, EngineError};
use crate::loader::{ConcurrentLoader, LoadStream};
use crate::raw::ThumbnailGenerator;
use crate::scan::{self, DateRange, FileScanner, ScanOutcome};
use crate::state::{Library, ThumbnailStore};

/// Outcome of a delete request. Failed paths stay where they were.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<DeleteError>,
}

pub struct Engine {
    config: EngineConfig,
    store: Arc<dyn ThumbnailStore>,
    loader: ConcurrentLoader,
}

impl Engine {
    /// Open the on-disk cache under `config.cache_dir` and start the workers.
    /// A cache that cannot be opened is fatal.
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        let library = Library::open(&config.cache_dir).map_err(EngineError::StoreInit)?;
        Self::with_store(config, Arc::new(library))
    }

    /// Run against an already opened store
    pub fn with_store(config: EngineConfig, store: Arc<dyn ThumbnailStore>) -> Result<Self, EngineError> {
        let loader = ConcurrentLoader::new(
            store.clone(),
            Arc::new(ThumbnailGenerator::new()),
            config.loader_options(),
        )
        .map_err(EngineError::Runtime)?;

        Ok(Self {
            config,
            store,
            loader,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loader(&self) -> &ConcurrentLoader {
        &self.loader
    }

    /// All supported images under `root`
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, EngineError> {
        let scanner = FileScanner::new(root)?.follow_links(self.config.follow_links);
        Ok(scanner.scan())
    }

    /// Scan, then keep only images whose effective date is in `range`
    pub fn scan_in_range(&self, root: &Path, range: Option<DateRange>) -> Result<ScanOutcome, EngineError> {
        let mut outcome = self.scan(root)?;
        if let Some(range) = range {
            outcome.paths = scan::filter_by_date(&outcome.paths, range);
        }
        Ok(outcome)
    }

    /// Start loading thumbnails for `paths`. `edge` defaults to the configured size.
    pub fn load_thumbnails(&self, paths: Vec<PathBuf>, edge: Option<u32>) -> LoadStream {
        self.loader
            .load(paths, edge.unwrap_or(self.config.thumbnail_edge))
    }

    /// What the browser does when a folder is opened: scan, filter, and
    /// start streaming thumbnails, superseding any earlier folder.
    pub fn open_folder(
        &self,
        root: &Path,
        range: Option<DateRange>,
        edge: Option<u32>,
    ) -> Result<(ScanOutcome, LoadStream), EngineError> {
        let outcome = self.scan_in_range(root, range)?;
        let stream = self.load_thumbnails(outcome.paths.clone(), edge);
        Ok((outcome, stream))
    }

    pub fn cancel(&self, generation: u64) {
        self.loader.cancel(generation);
    }

    /// Delete source files and purge their cached thumbnails
    pub fn delete(&self, paths: &[PathBuf]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for path in paths {
            let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            match fs::remove_file(path) {
                Ok(()) => {
                    if let Err(e) = self.store.remove_path(&canonical) {
                        log::warn!("Could not purge cache for {}: {}", path.display(), e);
                    }
                    log::info!("Deleted {}", path.display());
                    report.deleted.push(path.clone());
                }
                Err(source) => {
                    let err = DeleteError {
                        path: path.clone(),
                        source,
                    };
                    log::error!("{}", err);
                    report.failed.push(err);
                }
            }
        }

        report
    }

    pub fn clear_cache(&self) -> Result<(), EngineError> {
        self.store.clear().map_err(EngineError::Store)
    }

    pub fn cache_len(&self) -> Result<usize, EngineError> {
        self.store.len().map_err(EngineError::Store)
    }

    /// Stop the workers (letting running units finish) and close the store
    pub fn close(self) -> Result<(), EngineError> {
        let Engine { store, loader, .. } = self;
        drop(loader);
        store.close().map_err(EngineError::Store)
    }
}
