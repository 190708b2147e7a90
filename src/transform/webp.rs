//! WebP conversion

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{SitepipeError, SitepipeResult};

/// Path of the `.webp` sibling for an image path
pub fn webp_sibling(path: &Path) -> PathBuf {
    path.with_extension("webp")
}

/// Decode a PNG or JPEG and encode it as lossy WebP at `quality` (0-100)
pub fn encode_webp(file: &Path, bytes: &[u8], quality: u8) -> SitepipeResult<Vec<u8>> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| SitepipeError::transform("webp", file, e))?;

    // The encoder only accepts 8-bit RGB(A)
    let decoded = if decoded.color().has_alpha() {
        DynamicImage::ImageRgba8(decoded.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };

    let encoder = webp::Encoder::from_image(&decoded)
        .map_err(|e| SitepipeError::transform("webp", file, e))?;
    let memory = encoder.encode(f32::from(quality.min(100)));
    Ok(memory.to_vec())
}
