//! Thumbnail cache state
//!
//! This module handles:
//! - Cache keys and entries (data.rs)
//! - The store contract and an in-memory store (store.rs)
//! - The SQLite-backed persistent store (library.rs)

pub mod data;
pub mod library;
pub mod store;

pub use data::{CacheEntry, CacheKey, Fingerprint, Thumbnail};
pub use library::Library;
pub use store::{MemoryStore, ThumbnailStore};
