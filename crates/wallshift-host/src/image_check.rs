//! Image validation
//!
//! Wallpapers are decoded before they are handed to a backend, so a
//! truncated download or a mislabeled file fails here with a useful error
//! instead of leaving the desktop in a half-applied state.

use image::ImageReader;
use std::path::Path;

use crate::{HostError, HostResult};

/// File extensions the shuffle picker treats as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Whether a path has a recognized image extension (case-insensitive).
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Fully decode the image at `path`, returning its pixel dimensions.
///
/// The format is sniffed from the file contents, not the extension.
pub fn validate_image(path: &Path) -> HostResult<(u32, u32)> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    let img = reader.decode().map_err(|e| HostError::BadImage {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Ok((img.width(), img.height()))
}
