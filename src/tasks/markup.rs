use std::path::PathBuf;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;
use crate::transform::minify_markup;

use super::TaskContext;

/// Top-level pages only
pub const MARKUP_GLOBS: &[&str] = &["*.html"];

/// Minify top-level HTML pages into the build root
pub fn markup(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("markup", move || minify_pages(&ctx))
}

fn minify_pages(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let build = ctx.build_dir();
    SourceSet::new(ctx.source_dir(), MARKUP_GLOBS)?
        .files()?
        .into_iter()
        .map(|file| {
            let html = fs::read(&file.path)?;
            fs::write(&file.dest_in(&build), minify_markup(&html))
        })
        .collect()
}
