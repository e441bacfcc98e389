//! Date range filtering and date ordering of scanned paths.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::metadata::{effective_date, EffectiveDate};

/// Inclusive date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they were given backwards
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A scanned path together with its effective date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub date: EffectiveDate,
}

/// Resolve effective dates for `paths`, keeping their order.
/// Paths that vanished since the scan are logged and left out.
pub fn records(paths: &[PathBuf]) -> Vec<ImageRecord> {
    paths
        .iter()
        .filter_map(|path| match effective_date(path) {
            Ok(date) => Some(ImageRecord {
                path: path.clone(),
                date,
            }),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect()
}

/// Keep only the paths whose effective date lies in `range`, in input order
pub fn filter_by_date(paths: &[PathBuf], range: DateRange) -> Vec<PathBuf> {
    records(paths)
        .into_iter()
        .filter(|r| range.contains(r.date.date))
        .map(|r| r.path)
        .collect()
}

/// Stable sort by effective date, oldest first; ties keep scan order
pub fn sort_by_date(records: &mut [ImageRecord]) {
    records.sort_by_key(|r| r.date.date);
}
