use std::path::PathBuf;

use tracing::debug;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;
use crate::transform::{optimize_image, ImageKind};

use super::copy::copy_stream;
use super::TaskContext;

pub const IMAGE_GLOBS: &[&str] = &["img/**/*.{svg,png,jpg}"];

/// Recompress images into `img/`, keeping relative paths
pub fn images(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("images", move || optimize_all(&ctx))
}

/// Copy the same images untouched
pub fn copy_images(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::stream("copy-images", move || {
        copy_stream(ctx.source_dir(), ctx.build_dir(), IMAGE_GLOBS)
    })
}

fn optimize_all(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let build = ctx.build_dir();
    let mut written = Vec::new();

    for file in SourceSet::new(ctx.source_dir(), IMAGE_GLOBS)?.files()? {
        let Some(kind) = ImageKind::from_path(&file.path) else {
            continue;
        };
        let original = fs::read(&file.path)?;
        let optimized = optimize_image(kind, &file.path, &original, &ctx.config.images)?;
        debug!(
            file = %file.relative.display(),
            before = original.len(),
            after = optimized.len(),
            "optimized"
        );
        written.push(fs::write(&file.dest_in(&build), optimized)?);
    }

    Ok(written)
}
