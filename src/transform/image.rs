//! Raster and vector image recompression

use std::path::Path;

use jpeg_encoder::{ColorType, Encoder};

use crate::config::ImagesConfig;
use crate::error::{SitepipeError, SitepipeResult};

use super::svg::optimize_svg;

/// Image formats handled by the optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Svg,
}

impl ImageKind {
    /// Detect the kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// True for formats that get a WebP sibling
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

/// Recompress an image according to its kind
pub fn optimize_image(
    kind: ImageKind,
    file: &Path,
    bytes: &[u8],
    config: &ImagesConfig,
) -> SitepipeResult<Vec<u8>> {
    match kind {
        ImageKind::Png => optimize_png(file, bytes, config.png_level),
        ImageKind::Jpeg => optimize_jpeg(file, bytes, config.jpeg_quality),
        ImageKind::Svg => optimize_svg(file, bytes),
    }
}

fn optimize_png(file: &Path, bytes: &[u8], level: u8) -> SitepipeResult<Vec<u8>> {
    let options = oxipng::Options::from_preset(level.min(6));
    oxipng::optimize_from_memory(bytes, &options)
        .map_err(|e| SitepipeError::transform("oxipng", file, e))
}

/// Re-encode as a progressive JPEG at `quality`
fn optimize_jpeg(file: &Path, bytes: &[u8], quality: u8) -> SitepipeResult<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .map_err(|e| SitepipeError::transform("jpeg", file, e))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = match (u16::try_from(rgb.width()), u16::try_from(rgb.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(SitepipeError::transform(
                "jpeg",
                file,
                format!("{}x{} exceeds the 65535px JPEG limit", rgb.width(), rgb.height()),
            ))
        }
    };

    let mut out = Vec::with_capacity(bytes.len());
    let mut encoder = Encoder::new(&mut out, quality.clamp(1, 100));
    encoder.set_progressive(true);
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| SitepipeError::transform("jpeg", file, e))?;
    Ok(out)
}
