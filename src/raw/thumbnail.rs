use image::{imageops::FilterType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use super::embedded;
use crate::error::GenerateError;
use crate::scan::is_raw;
use crate::state::data::Thumbnail;

/// Produces a preview bitmap for one source file.
///
/// No memoisation happens at this level; caching is the store's job.
pub trait Generator: Send + Sync {
    fn generate(&self, path: &Path, edge: u32) -> Result<Thumbnail, GenerateError>;
}

/// Decodes with the `image` crate (embedded JPEG previews for raw files),
/// scales the longer edge to the requested length and encodes RGBA8 PNG.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    filter: FilterType,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ThumbnailGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Generator for ThumbnailGenerator {
    fn generate(&self, path: &Path, edge: u32) -> Result<Thumbnail, GenerateError> {
        if edge == 0 {
            return Err(GenerateError::ZeroEdge);
        }

        let metadata = fs::metadata(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() == 0 {
            return Err(GenerateError::Empty(path.to_path_buf()));
        }

        let img = decode_source(path)?;

        // Resize maintaining aspect ratio, longer edge = `edge`
        let thumbnail = img.resize(edge, edge, self.filter);
        let rgba = DynamicImage::ImageRgba8(thumbnail.to_rgba8());

        let mut png = Cursor::new(Vec::new());
        rgba.write_to(&mut png, ImageFormat::Png)
            .map_err(GenerateError::Encode)?;

        log::debug!(
            "Generated {}x{} thumbnail for {}",
            rgba.width(),
            rgba.height(),
            path.display()
        );

        Ok(Thumbnail {
            png: png.into_inner(),
            width: rgba.width(),
            height: rgba.height(),
            cached: false,
        })
    }
}

/// Decode the full image. Raw files go through their embedded preview
/// first and fall back to the generic decoder.
fn decode_source(path: &Path) -> Result<DynamicImage, GenerateError> {
    if is_raw(path) {
        match embedded::largest_preview(path) {
            Ok(Some(img)) => return Ok(img),
            Ok(None) => log::debug!("No embedded preview in {}", path.display()),
            Err(source) => {
                return Err(GenerateError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
        return decode_generic(path).map_err(|e| match e {
            GenerateError::Decode { .. } => GenerateError::Unsupported(path.to_path_buf()),
            other => other,
        });
    }

    decode_generic(path)
}

fn decode_generic(path: &Path) -> Result<DynamicImage, GenerateError> {
    let io_err = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let decode_err = |source| GenerateError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?;
    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    let orientation = decoder.orientation().map_err(decode_err)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    img.apply_orientation(orientation);
    Ok(img)
}
