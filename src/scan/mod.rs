//! Folder indexing
//!
//! This module handles:
//! - Finding supported image and raw files under a folder (scanner.rs)
//! - Deriving the effective date of each file (metadata.rs)
//! - Filtering and ordering by that date (filter.rs)

pub mod filter;
pub mod metadata;
pub mod scanner;

pub use filter::{filter_by_date, records, sort_by_date, DateRange, ImageRecord};
pub use metadata::{effective_date, DateSource, EffectiveDate};
pub use scanner::{is_raw, is_supported, FileScanner, ScanOutcome};
