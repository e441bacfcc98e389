//! Thumbnail generation
//!
//! This module handles:
//! - Decoding source images and scaling them to preview size (thumbnail.rs)
//! - Pulling embedded JPEG previews out of raw camera files (embedded.rs)

pub mod embedded;
pub mod thumbnail;

pub use thumbnail::{Generator, ThumbnailGenerator};
