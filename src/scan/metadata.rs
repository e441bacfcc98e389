//! Effective date of an image: EXIF capture time when available, file
//! modification time otherwise.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use exif::{In, Tag, Value};

use crate::error::MetadataError;

/// Capture-time tags, most specific first
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Where an effective date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

/// Returns the date used to filter and sort `path`.
///
/// Missing or malformed metadata, and containers that cannot be opened at
/// all, silently fall back to the modification time. Only a path that
/// cannot even be stat'ed is an error.
pub fn effective_date(path: &Path) -> Result<EffectiveDate, MetadataError> {
    if let Some(date) = exif_date(path) {
        return Ok(EffectiveDate {
            date,
            source: DateSource::Exif,
        });
    }

    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| MetadataError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(EffectiveDate {
        date: local_date(modified),
        source: DateSource::Modified,
    })
}

pub(crate) fn local_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}

/// Read the first parseable capture timestamp out of the file's EXIF block
pub fn exif_date(path: &Path) -> Option<NaiveDate> {
    let file = File::open(path).ok()?;
    let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("No EXIF in {}: {}", path.display(), e);
            return None;
        }
    };

    DATE_TAGS.iter().find_map(|&tag| {
        let field = exif.get_field(tag, In::PRIMARY)?;
        let date = parse_exif_datetime(&field.value);
        if date.is_none() {
            log::debug!("Malformed {} in {}", tag, path.display());
        }
        date
    })
}

fn parse_exif_datetime(value: &Value) -> Option<NaiveDate> {
    let Value::Ascii(ref parts) = *value else {
        return None;
    };
    let raw = parts.first()?;
    let text = std::str::from_utf8(raw).ok()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(text, EXIF_DATE_FORMAT)
        .ok()
        .map(|dt| dt.date())
}
