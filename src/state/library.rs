use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::data::{png_dimensions, CacheEntry, CacheKey};
use super::store::ThumbnailStore;
use crate::error::StoreError;

/// File name of the thumbnail database inside the cache directory
pub const DB_FILE_NAME: &str = "thumbnails.db";

/// The Library is the on-disk thumbnail cache, one SQLite database.
///
/// A single connection sits behind a mutex, so every statement runs to
/// completion before the next one starts. Each write is a single
/// `INSERT OR REPLACE`, which means readers see either the old row or the
/// new one, never a torn blob.
pub struct Library {
    conn: Mutex<Option<Connection>>,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the cache database under `cache_dir`
    pub fn open(cache_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(cache_dir).map_err(|source| StoreError::Io {
            path: cache_dir.to_path_buf(),
            source,
        })?;

        let db_path = cache_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        log::info!("Thumbnail cache opened at {}", db_path.display());
        Self::with_connection(conn, db_path)
    }

    /// Cache that lives only as long as this value
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    fn with_connection(conn: Connection, db_path: PathBuf) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init_schema(&conn)?;
        Ok(Library {
            conn: Mutex::new(Some(conn)),
            db_path,
        })
    }

    /// Create the thumbnails table if it does not exist yet.
    ///
    /// Only one row is kept per (path, edge); the fingerprint columns decide
    /// whether that row still matches the file on disk.
    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS thumbnails (
                path            TEXT NOT NULL,
                edge            INTEGER NOT NULL,
                mtime_ns        INTEGER NOT NULL,
                size            INTEGER NOT NULL,
                png             BLOB NOT NULL,
                created_at      INTEGER NOT NULL,
                PRIMARY KEY (path, edge)
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T, StoreError> {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(f(conn)?)
    }
}

impl ThumbnailStore for Library {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        let path = key.path_str();
        // Read and purge under one lock so a concurrent put is never lost
        let png = self.with_conn(|conn| {
            let png: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT png FROM thumbnails
                     WHERE path = ?1 AND edge = ?2 AND mtime_ns = ?3 AND size = ?4",
                    params![path, key.edge, key.fingerprint.modified_ns, key.fingerprint.size as i64],
                    |row| row.get(0),
                )
                .optional()?;

            match png {
                Some(png) if png_dimensions(&png).is_none() => {
                    log::warn!("Dropping unreadable cached thumbnail for {}", path);
                    conn.execute(
                        "DELETE FROM thumbnails WHERE path = ?1 AND edge = ?2 AND png = ?3",
                        params![path, key.edge, png],
                    )?;
                    Ok(None)
                }
                other => Ok(other),
            }
        })?;

        Ok(png.map(|png| CacheEntry {
            key: key.clone(),
            png,
        }))
    }

    fn put(&self, key: &CacheKey, png: &[u8]) -> Result<(), StoreError> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO thumbnails (path, edge, mtime_ns, size, png, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key.path_str(),
                    key.edge,
                    key.fingerprint.modified_ns,
                    key.fingerprint.size as i64,
                    png,
                    now,
                ],
            )
        })?;
        Ok(())
    }

    fn remove_path(&self, path: &Path) -> Result<usize, StoreError> {
        let path = path.to_string_lossy().to_string();
        self.with_conn(|conn| conn.execute("DELETE FROM thumbnails WHERE path = ?1", params![path]))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let removed = self.with_conn(|conn| conn.execute("DELETE FROM thumbnails", []))?;
        log::info!("Cleared {} cached thumbnails", removed);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM thumbnails", [], |row| row.get(0))
        })?;
        Ok(count as usize)
    }

    fn close(&self) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            log::info!("Thumbnail cache closed");
        }
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
