use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use super::data::{png_dimensions, CacheEntry, CacheKey};
use crate::error::StoreError;

/// Persistent thumbnail cache shared by all loader workers.
///
/// Implementations must be safe for concurrent use: the last `put` for a key
/// wins, readers never observe a partially written entry, and `clear` must
/// not deadlock against outstanding `get`/`put` calls.
pub trait ThumbnailStore: Send + Sync {
    /// Look up `key`. A stored blob that is not a readable PNG is a miss.
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError>;

    /// Insert or replace the entry for `key`
    fn put(&self, key: &CacheKey, png: &[u8]) -> Result<(), StoreError>;

    /// Drop every entry derived from `path`, whatever its size or fingerprint.
    /// Returns the number of entries removed.
    fn remove_path(&self, path: &Path) -> Result<usize, StoreError>;

    /// Remove all entries
    fn clear(&self) -> Result<(), StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Release the backing resources. Every later call fails with `StoreError::Closed`.
    fn close(&self) -> Result<(), StoreError>;
}

/// Volatile store used by tests and by callers that do not want a disk cache
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<Option<HashMap<CacheKey, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailStore for MemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entries = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(entries
            .get(key)
            .filter(|png| png_dimensions(png).is_some())
            .map(|png| CacheEntry {
                key: key.clone(),
                png: png.clone(),
            }))
    }

    fn put(&self, key: &CacheKey, png: &[u8]) -> Result<(), StoreError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entries = guard.as_mut().ok_or(StoreError::Closed)?;
        // Mirror the SQLite store: one live entry per (path, edge)
        entries.retain(|k, _| !(k.path == key.path && k.edge == key.edge));
        entries.insert(key.clone(), png.to_vec());
        Ok(())
    }

    fn remove_path(&self, path: &Path) -> Result<usize, StoreError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entries = guard.as_mut().ok_or(StoreError::Closed)?;
        let before = entries.len();
        entries.retain(|k, _| k.path != path);
        Ok(before - entries.len())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().ok_or(StoreError::Closed)?.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.as_ref().ok_or(StoreError::Closed)?.len())
    }

    fn close(&self) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::data::Fingerprint;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    pub(crate) fn key(path: &str, edge: u32, modified_ns: i64) -> CacheKey {
        CacheKey {
            path: PathBuf::from(path),
            edge,
            fingerprint: Fingerprint {
                modified_ns,
                size: 10,
            },
        }
    }

    pub(crate) fn png(w: u32, h: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::new(w, h)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    /// Behaviour every store implementation must share
    pub(crate) fn exercise_store(store: &dyn ThumbnailStore) {
        let k = key("/photos/a.jpg", 100, 1);
        assert!(store.get(&k).unwrap().is_none());

        let bytes = png(10, 5);
        store.put(&k, &bytes).unwrap();
        assert_eq!(store.get(&k).unwrap().unwrap().png, bytes);

        // last writer wins
        let newer = png(5, 10);
        store.put(&k, &newer).unwrap();
        assert_eq!(store.get(&k).unwrap().unwrap().png, newer);
        assert_eq!(store.len().unwrap(), 1);

        // size is part of the key
        assert!(store.get(&key("/photos/a.jpg", 200, 1)).unwrap().is_none());

        // a changed fingerprint misses, and regenerating replaces the stale row
        let edited = key("/photos/a.jpg", 100, 2);
        assert!(store.get(&edited).unwrap().is_none());
        store.put(&edited, &bytes).unwrap();
        assert!(store.get(&k).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);

        // undecodable blobs are misses
        let junk = key("/photos/junk.jpg", 100, 1);
        store.put(&junk, b"definitely not png").unwrap();
        assert!(store.get(&junk).unwrap().is_none());

        store.put(&key("/photos/a.jpg", 300, 2), &bytes).unwrap();
        store.put(&key("/photos/b.jpg", 100, 1), &bytes).unwrap();
        assert_eq!(store.remove_path(Path::new("/photos/a.jpg")).unwrap(), 2);
        assert!(store.get(&key("/photos/b.jpg", 100, 1)).unwrap().is_some());

        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.get(&key("/photos/b.jpg", 100, 1)).unwrap().is_none());

        store.close().unwrap();
        assert!(matches!(store.get(&k), Err(StoreError::Closed)));
        assert!(matches!(store.put(&k, &bytes), Err(StoreError::Closed)));
    }

    #[test]
    fn test_memory_store_contract() {
        exercise_store(&MemoryStore::new());
    }
}
