use std::path::PathBuf;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;
use crate::transform::{encode_webp, webp_sibling};

use super::TaskContext;

pub const WEBP_GLOBS: &[&str] = &["img/**/*.{png,jpg}"];

/// Write a `.webp` sibling for every raster image
pub fn webp(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("webp", move || convert_all(&ctx))
}

fn convert_all(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let build = ctx.build_dir();
    let quality = ctx.config.images.webp_quality;

    SourceSet::new(ctx.source_dir(), WEBP_GLOBS)?
        .files()?
        .into_iter()
        .map(|file| {
            let bytes = fs::read(&file.path)?;
            let encoded = encode_webp(&file.path, &bytes, quality)?;
            fs::write(&webp_sibling(&file.dest_in(&build)), encoded)
        })
        .collect()
}
