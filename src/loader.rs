//! Concurrent thumbnail loading
//!
//! Each path of a [`LoadRequest`] becomes one unit of work: look the
//! thumbnail up in the store, generate it on a miss, write it back and hand
//! the result to the caller. Units run on a fixed-size blocking pool and
//! results arrive in completion order, so callers correlate by path.
//!
//! Newer requests supersede older ones through generation tokens. A unit
//! that already started is never interrupted; its result is simply not
//! delivered once its generation is stale, and a stale generation
//! dispatches no further units. Staleness is checked again on the receiving
//! side, so results still buffered in an old stream are dropped as well.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinSet;

use crate::error::LoadError;
use crate::raw::Generator;
use crate::state::{CacheKey, Thumbnail, ThumbnailStore};

/// A batch of paths to thumbnail at one edge length. Built by
/// [`ConcurrentLoader::request`], which hands out the generation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub paths: Vec<PathBuf>,
    pub edge: u32,
    generation: u64,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One delivered result
#[derive(Debug)]
pub struct LoadEvent {
    pub path: PathBuf,
    pub generation: u64,
    pub result: Result<Thumbnail, LoadError>,
}

/// Receiving end of a submitted request. Ends once every dispatched unit
/// has finished, or immediately if the request was already stale.
#[derive(Debug)]
pub struct LoadStream {
    generation: u64,
    generations: Arc<Generations>,
    rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl LoadStream {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next result, or `None` once the stream ended or went stale
    pub async fn recv(&mut self) -> Option<LoadEvent> {
        let event = self.rx.recv().await?;
        self.keep_live(event)
    }

    /// Blocking receive for callers outside an async context
    pub fn blocking_recv(&mut self) -> Option<LoadEvent> {
        let event = self.rx.blocking_recv()?;
        self.keep_live(event)
    }

    pub fn try_recv(&mut self) -> Option<LoadEvent> {
        let event = self.rx.try_recv().ok()?;
        self.keep_live(event)
    }

    /// Block until the stream ends and return everything delivered
    pub fn collect_blocking(mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.blocking_recv() {
            events.push(event);
        }
        events
    }

    /// A stale generation never becomes live again, so the rest of the
    /// buffer is dropped along with this event.
    fn keep_live(&mut self, event: LoadEvent) -> Option<LoadEvent> {
        if self.generations.is_live(self.generation) {
            return Some(event);
        }
        debug!("Generation {} is stale, dropping buffered results", self.generation);
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Maximum number of units running at once
    pub workers: usize,
    /// Give up waiting on a single unit after this long
    pub unit_timeout: Option<Duration>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        Self {
            workers: (parallelism * 2).max(2),
            unit_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Generation bookkeeping. Only the newest submitted generation is live,
/// and only until it is cancelled.
#[derive(Debug, Default)]
struct Generations {
    issued: AtomicU64,
    latest: AtomicU64,
    cancelled_through: AtomicU64,
}

impl Generations {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Make `generation` the latest one. Tokens from a cloned request may
    /// run ahead of the counter, so `issued` follows along.
    fn advance(&self, generation: u64) {
        self.issued.fetch_max(generation, Ordering::SeqCst);
        self.latest.fetch_max(generation, Ordering::SeqCst);
    }

    fn is_live(&self, generation: u64) -> bool {
        generation == self.latest.load(Ordering::SeqCst)
            && generation > self.cancelled_through.load(Ordering::SeqCst)
    }
}

/// Bounded worker pool that turns load requests into thumbnail streams
pub struct ConcurrentLoader {
    store: Arc<dyn ThumbnailStore>,
    generator: Arc<dyn Generator>,
    runtime: Option<Runtime>,
    permits: Arc<Semaphore>,
    generations: Arc<Generations>,
    options: LoaderOptions,
}

impl ConcurrentLoader {
    /// Start the worker pool on its own runtime.
    ///
    /// Dropping the loader waits for running units, unless it is dropped
    /// from inside another Tokio runtime; then they are left to finish in
    /// the background.
    pub fn new(
        store: Arc<dyn ThumbnailStore>,
        generator: Arc<dyn Generator>,
        options: LoaderOptions,
    ) -> std::io::Result<Self> {
        let workers = options.workers.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("thumbnail-loader")
            .worker_threads(2)
            .max_blocking_threads(workers)
            .enable_time()
            .build()?;

        debug!("Thumbnail loader started with {} workers", workers);

        Ok(Self {
            store,
            generator,
            runtime: Some(runtime),
            permits: Arc::new(Semaphore::new(workers)),
            generations: Arc::new(Generations::default()),
            options: LoaderOptions { workers, ..options },
        })
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Build a request carrying a fresh generation token
    pub fn request(&self, paths: Vec<PathBuf>, edge: u32) -> LoadRequest {
        LoadRequest {
            paths,
            edge,
            generation: self.generations.issue(),
        }
    }

    /// Queue a request and return its result stream right away.
    ///
    /// Submitting makes this request's generation the live one; any older
    /// generation stops dispatching and its pending results are dropped.
    pub fn submit(&self, request: LoadRequest) -> LoadStream {
        let LoadRequest {
            paths,
            edge,
            generation,
        } = request;
        let (tx, rx) = mpsc::unbounded_channel();
        let stream = LoadStream {
            generation,
            generations: self.generations.clone(),
            rx,
        };

        self.generations.advance(generation);
        if !self.generations.is_live(generation) {
            debug!("Generation {} is already stale, nothing to load", generation);
            return stream;
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return stream;
        };

        // Upstream dedupe: one unit per path within a request
        let mut seen = HashSet::new();
        let paths: Vec<PathBuf> = paths.into_iter().filter(|p| seen.insert(p.clone())).collect();

        debug!("Generation {}: loading {} thumbnails at {}px", generation, paths.len(), edge);

        let unit = Unit {
            store: self.store.clone(),
            generator: self.generator.clone(),
            edge,
            timeout: self.options.unit_timeout,
        };
        let permits = self.permits.clone();
        let generations = self.generations.clone();

        runtime.spawn(async move {
            let mut units = JoinSet::new();
            let mut dispatched = 0usize;

            for path in paths {
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                if !generations.is_live(generation) {
                    debug!("Generation {} superseded after {} units", generation, dispatched);
                    break;
                }

                let unit = unit.clone();
                let generations = generations.clone();
                let tx = tx.clone();
                dispatched += 1;

                units.spawn(async move {
                    let result = unit.run(path.clone()).await;
                    drop(permit);

                    if generations.is_live(generation) {
                        let _ = tx.send(LoadEvent {
                            path,
                            generation,
                            result,
                        });
                    } else {
                        debug!("Discarding stale result for {}", path.display());
                    }
                });
            }

            drop(tx);
            while units.join_next().await.is_some() {}
            debug!("Generation {} finished ({} units)", generation, dispatched);
        });

        stream
    }

    /// Convenience for `submit(request(paths, edge))`
    pub fn load(&self, paths: Vec<PathBuf>, edge: u32) -> LoadStream {
        let request = self.request(paths, edge);
        self.submit(request)
    }

    /// Stop delivering results for `generation`. No effect on newer ones.
    pub fn cancel(&self, generation: u64) {
        self.generations
            .cancelled_through
            .fetch_max(generation, Ordering::SeqCst);
    }

    /// Cancel whatever generation is currently live
    pub fn cancel_all(&self) {
        self.cancel(self.generations.latest.load(Ordering::SeqCst));
    }

    pub fn is_live(&self, generation: u64) -> bool {
        self.generations.is_live(generation)
    }
}

impl Drop for ConcurrentLoader {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        // Blocking on shutdown inside a runtime panics
        if tokio::runtime::Handle::try_current().is_ok() {
            runtime.shutdown_background();
        }
    }
}

/// Everything a single unit of work needs
#[derive(Clone)]
struct Unit {
    store: Arc<dyn ThumbnailStore>,
    generator: Arc<dyn Generator>,
    edge: u32,
    timeout: Option<Duration>,
}

impl Unit {
    async fn run(self, path: PathBuf) -> Result<Thumbnail, LoadError> {
        let timeout = self.timeout;
        let (started_tx, started_rx) = oneshot::channel();
        let work = tokio::task::spawn_blocking(move || {
            let _ = started_tx.send(());
            self.process(&path)
        });

        let joined = match timeout {
            Some(limit) => {
                // The clock starts once a blocking thread picks the unit up,
                // not while it queues behind a unit that timed out earlier.
                let _ = started_rx.await;
                match tokio::time::timeout(limit, work).await {
                    Ok(joined) => joined,
                    Err(_) => return Err(LoadError::TimedOut(limit)),
                }
            }
            None => work.await,
        };

        joined.unwrap_or_else(|e| {
            warn!("Thumbnail worker failed: {}", e);
            Err(LoadError::WorkerPanicked)
        })
    }

    /// Store lookup, generation on a miss, write-back. Store failures only
    /// cost a regeneration.
    fn process(&self, path: &Path) -> Result<Thumbnail, LoadError> {
        let key = CacheKey::for_file(path, self.edge).map_err(|source| LoadError::SourceMissing {
            path: path.to_path_buf(),
            source,
        })?;

        match self.store.get(&key) {
            Ok(Some(entry)) => {
                if let Some(thumbnail) = Thumbnail::from_png(entry.png, true) {
                    return Ok(thumbnail);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed for {}: {}", path.display(), e),
        }

        let thumbnail = self.generator.generate(path, self.edge)?;

        if let Err(e) = self.store.put(&key, &thumbnail.png) {
            warn!("Cache write failed for {}: {}", path.display(), e);
        }

        Ok(thumbnail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::raw::ThumbnailGenerator;
    use crate::state::MemoryStore;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Condvar, Mutex};

    /// Real generator that counts its calls
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        inner: ThumbnailGenerator,
    }

    impl Generator for Counting {
        fn generate(&self, path: &Path, edge: u32) -> Result<Thumbnail, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate(path, edge)
        }
    }

    /// Holds every path whose name starts with "slow" until opened
    #[derive(Default)]
    struct Gate {
        open: Mutex<bool>,
        cond: Condvar,
        slow_calls: AtomicUsize,
        inner: ThumbnailGenerator,
    }

    impl Gate {
        fn open(&self) {
            *self.open.lock().unwrap() = true;
            self.cond.notify_all();
        }
    }

    impl Generator for Gate {
        fn generate(&self, path: &Path, edge: u32) -> Result<Thumbnail, GenerateError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("slow") {
                self.slow_calls.fetch_add(1, Ordering::SeqCst);
                let mut open = self.open.lock().unwrap();
                while !*open {
                    open = self.cond.wait(open).unwrap();
                }
            }
            self.inner.generate(path, edge)
        }
    }

    /// Sleeps on every path whose name starts with "slow"
    struct Sleepy(Duration);

    impl Generator for Sleepy {
        fn generate(&self, path: &Path, edge: u32) -> Result<Thumbnail, GenerateError> {
            if path.file_name().unwrap().to_string_lossy().starts_with("slow") {
                std::thread::sleep(self.0);
            }
            ThumbnailGenerator::new().generate(path, edge)
        }
    }

    fn images(dir: &Path, prefix: &str, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("{}_{}.png", prefix, i));
                RgbImage::from_pixel(40, 20, Rgb([i as u8, 0, 0])).save(&path).unwrap();
                path
            })
            .collect()
    }

    fn options(workers: usize) -> LoaderOptions {
        LoaderOptions {
            workers,
            unit_timeout: None,
        }
    }

    #[test]
    fn test_every_path_yields_one_event() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "img", 12);
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ThumbnailGenerator::new()),
            options(3),
        )
        .unwrap();

        let events = loader.load(paths.clone(), 20).collect_blocking();

        assert_eq!(events.len(), paths.len());
        let by_path: HashMap<_, _> = events.into_iter().map(|e| (e.path, e.result)).collect();
        for path in &paths {
            let thumb = by_path[path].as_ref().unwrap();
            assert_eq!((thumb.width, thumb.height), (20, 10));
        }
    }

    #[test]
    fn test_second_request_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "a", 1);
        let generator = Arc::new(Counting::default());
        let loader =
            ConcurrentLoader::new(Arc::new(MemoryStore::new()), generator.clone(), options(2)).unwrap();

        let first = loader.load(paths.clone(), 32).collect_blocking();
        let second = loader.load(paths.clone(), 32).collect_blocking();

        assert!(!first[0].result.as_ref().unwrap().cached);
        let hit = second[0].result.as_ref().unwrap();
        assert!(hit.cached);
        assert_eq!(hit.png, first[0].result.as_ref().unwrap().png);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        // a different size is a different key
        loader.load(paths, 16).collect_blocking();
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_modified_source_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edit.png");
        RgbImage::new(40, 20).save(&path).unwrap();
        filetime::set_file_mtime(&path, filetime::FileTime::from_unix_time(1_000, 0)).unwrap();

        let generator = Arc::new(Counting::default());
        let loader =
            ConcurrentLoader::new(Arc::new(MemoryStore::new()), generator.clone(), options(1)).unwrap();
        loader.load(vec![path.clone()], 20).collect_blocking();

        RgbImage::new(20, 40).save(&path).unwrap();
        filetime::set_file_mtime(&path, filetime::FileTime::from_unix_time(2_000, 0)).unwrap();
        let events = loader.load(vec![path], 20).collect_blocking();

        let thumb = events[0].result.as_ref().unwrap();
        assert!(!thumb.cached);
        assert_eq!((thumb.width, thumb.height), (10, 20));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_corrupt_file_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = images(dir.path(), "a", 1).remove(0);
        let corrupt = dir.path().join("corrupt.jpg");
        fs::write(&corrupt, b"\xff\xd8\xff\xe0 broken").unwrap();
        let missing = dir.path().join("missing.jpg");

        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ThumbnailGenerator::new()),
            options(2),
        )
        .unwrap();
        let events = loader
            .load(vec![good.clone(), corrupt.clone(), missing.clone()], 10)
            .collect_blocking();

        assert_eq!(events.len(), 3);
        for event in events {
            if event.path == good {
                assert!(event.result.is_ok());
            } else if event.path == corrupt {
                assert!(matches!(
                    event.result,
                    Err(LoadError::Generate(GenerateError::Decode { .. }))
                ));
            } else {
                assert_eq!(event.path, missing);
                assert!(matches!(event.result, Err(LoadError::SourceMissing { .. })));
            }
        }
    }

    #[test]
    fn test_newer_generation_suppresses_older_results() {
        let dir = tempfile::tempdir().unwrap();
        let slow = images(dir.path(), "slow", 10);
        let fast = images(dir.path(), "fast", 3);
        let gate = Arc::new(Gate::default());
        let loader =
            ConcurrentLoader::new(Arc::new(MemoryStore::new()), gate.clone(), options(2)).unwrap();

        let old = loader.load(slow, 10);
        let new = loader.load(fast.clone(), 10);
        assert!(!loader.is_live(old.generation()));
        assert!(loader.is_live(new.generation()));

        gate.open();

        let fresh = new.collect_blocking();
        assert_eq!(fresh.len(), fast.len());
        assert!(fresh.iter().all(|e| e.result.is_ok()));

        assert!(old.collect_blocking().is_empty());
        // only units already holding a worker ran for the stale generation
        assert!(gate.slow_calls.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_cancel_discards_in_flight_results() {
        let dir = tempfile::tempdir().unwrap();
        let slow = images(dir.path(), "slow", 4);
        let gate = Arc::new(Gate::default());
        let loader =
            ConcurrentLoader::new(Arc::new(MemoryStore::new()), gate.clone(), options(2)).unwrap();

        let stream = loader.load(slow, 10);
        loader.cancel(stream.generation());
        assert!(!loader.is_live(stream.generation()));
        gate.open();

        assert!(stream.collect_blocking().is_empty());
    }

    #[test]
    fn test_stale_request_yields_empty_stream() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "a", 2);
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ThumbnailGenerator::new()),
            options(2),
        )
        .unwrap();

        let older = loader.request(paths.clone(), 10);
        let newer = loader.request(paths.clone(), 10);
        assert!(newer.generation > older.generation);

        let newer_events = loader.submit(newer).collect_blocking();
        assert_eq!(newer_events.len(), 2);
        assert!(loader.submit(older).collect_blocking().is_empty());
    }

    #[test]
    fn test_duplicate_paths_are_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = images(dir.path(), "dup", 1).remove(0);
        let generator = Arc::new(Counting::default());
        let loader =
            ConcurrentLoader::new(Arc::new(MemoryStore::new()), generator.clone(), options(4)).unwrap();

        let events = loader
            .load(vec![path.clone(), path.clone(), path], 10)
            .collect_blocking();
        assert_eq!(events.len(), 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unavailable_store_degrades_to_regeneration() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "a", 2);
        let store = Arc::new(MemoryStore::new());
        store.close().unwrap();
        let generator = Arc::new(Counting::default());
        let loader = ConcurrentLoader::new(store, generator.clone(), options(2)).unwrap();

        let first = loader.load(paths.clone(), 10).collect_blocking();
        let second = loader.load(paths, 10).collect_blocking();

        assert!(first.iter().chain(&second).all(|e| e.result.is_ok()));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_unit_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "slow", 1);
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Sleepy(Duration::from_millis(500))),
            LoaderOptions {
                workers: 1,
                unit_timeout: Some(Duration::from_millis(20)),
            },
        )
        .unwrap();

        let events = loader.load(paths, 10).collect_blocking();
        assert!(matches!(events[0].result, Err(LoadError::TimedOut(_))));
    }

    #[test]
    fn test_generations_are_monotonic() {
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ThumbnailGenerator::new()),
            options(1),
        )
        .unwrap();
        let a = loader.request(Vec::new(), 10).generation;
        let b = loader.request(Vec::new(), 10).generation;
        let c = loader.request(Vec::new(), 10).generation;
        assert!(a < b && b < c);
    }

    #[test]
    fn test_finished_but_unread_results_are_dropped_on_supersede() {
        let dir = tempfile::tempdir().unwrap();
        let fast = images(dir.path(), "fast", 1).remove(0);
        let slow = images(dir.path(), "slow", 1).remove(0);
        let other = images(dir.path(), "other", 1).remove(0);
        let store = Arc::new(MemoryStore::new());
        let gate = Arc::new(Gate::default());
        let loader = ConcurrentLoader::new(store.clone(), gate.clone(), options(2)).unwrap();

        let mut old = loader.load(vec![fast, slow], 10);
        // wait for the fast unit to finish and sit in the stream unread
        while store.len().unwrap() == 0 {
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(100));

        let new = loader.load(vec![other.clone()], 10);
        gate.open();

        assert!(old.try_recv().is_none());
        assert!(old.collect_blocking().is_empty());
        let fresh = new.collect_blocking();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].path, other);
    }

    #[test]
    fn test_timed_out_unit_does_not_fail_the_next_one() {
        let dir = tempfile::tempdir().unwrap();
        let slow = images(dir.path(), "slow", 1).remove(0);
        let fast = images(dir.path(), "fast", 1).remove(0);
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Sleepy(Duration::from_millis(600))),
            LoaderOptions {
                workers: 1,
                unit_timeout: Some(Duration::from_millis(100)),
            },
        )
        .unwrap();

        let events = loader.load(vec![slow.clone(), fast.clone()], 10).collect_blocking();
        let by_path: HashMap<_, _> = events.into_iter().map(|e| (e.path, e.result)).collect();

        assert!(matches!(by_path[&slow], Err(LoadError::TimedOut(_))));
        assert!(by_path[&fast].is_ok());
    }

    #[test]
    fn test_handmade_generation_does_not_starve_later_requests() {
        let dir = tempfile::tempdir().unwrap();
        let paths = images(dir.path(), "a", 1);
        let loader = ConcurrentLoader::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ThumbnailGenerator::new()),
            options(1),
        )
        .unwrap();

        let ahead = LoadRequest {
            paths: paths.clone(),
            edge: 10,
            generation: 50,
        };
        assert_eq!(loader.submit(ahead).collect_blocking().len(), 1);

        let next = loader.request(paths, 10);
        assert!(next.generation() > 50);
        assert_eq!(loader.submit(next).collect_blocking().len(), 1);
    }

    #[test]
    fn test_drop_inside_async_context() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let loader = ConcurrentLoader::new(
                Arc::new(MemoryStore::new()),
                Arc::new(ThumbnailGenerator::new()),
                options(1),
            )
            .unwrap();
            drop(loader);
        });
    }
}
