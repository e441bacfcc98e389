//! Embedded preview extraction for raw camera files.
//!
//! Nearly every raw container carries one or more full JPEG previews next
//! to the sensor data. Decoding those is far cheaper than demosaicing.

use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::Path;

const JPEG_START: [u8; 3] = [0xFF, 0xD8, 0xFF];
const JPEG_END: [u8; 2] = [0xFF, 0xD9];

/// Maximum number of JPEG start markers examined per file
const MAX_CANDIDATES: usize = 64;

/// Decode the largest embedded JPEG that actually decodes.
/// Returns None when the file holds no usable preview.
pub fn largest_preview(raw_path: &Path) -> std::io::Result<Option<DynamicImage>> {
    let data = fs::read(raw_path)?;
    Ok(largest_preview_in(&data))
}

pub fn largest_preview_in(data: &[u8]) -> Option<DynamicImage> {
    let mut candidates = jpeg_candidates(data);

    // Try JPEGs from largest to smallest
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));

    for jpeg in candidates {
        match image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg) {
            Ok(img) => {
                log::debug!("Using {}KB embedded JPEG", jpeg.len() / 1024);
                return Some(img);
            }
            Err(e) => log::debug!("Skipping embedded JPEG candidate: {}", e),
        }
    }

    None
}

/// Slices between each SOI marker and the next EOI marker after it
fn jpeg_candidates(data: &[u8]) -> Vec<&[u8]> {
    let mut candidates = Vec::new();
    let mut pos = 0;

    while pos + JPEG_START.len() <= data.len() && candidates.len() < MAX_CANDIDATES {
        let Some(start) = find(&data[pos..], &JPEG_START).map(|p| pos + p) else {
            break;
        };
        match find(&data[start..], &JPEG_END) {
            Some(end_offset) => {
                let end = start + end_offset + JPEG_END.len();
                candidates.push(&data[start..end]);
            }
            None => break,
        }
        // Nested previews start inside the outer one, so keep scanning from just past this SOI
        pos = start + JPEG_START.len();
    }

    candidates
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
