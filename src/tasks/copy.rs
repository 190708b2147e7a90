use std::path::PathBuf;

use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;

use super::TaskContext;

/// Static files copied verbatim, relative to the source root
pub const COPY_GLOBS: &[&str] = &[
    "fonts/*.{woff2,woff}",
    "*.ico",
    "img/**/*.svg",
    "!img/icons/*.svg",
];

/// Copy fonts, favicons and loose SVGs into the build root
pub fn copy(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::stream("copy", move || {
        copy_stream(ctx.source_dir(), ctx.build_dir(), COPY_GLOBS)
    })
}

/// Stream of byte-identical copies, one item per written file
pub(crate) fn copy_stream(
    source: PathBuf,
    dest: PathBuf,
    patterns: &'static [&'static str],
) -> BoxStream<'static, SitepipeResult<PathBuf>> {
    let files = match SourceSet::new(source, patterns).and_then(|set| set.files()) {
        Ok(files) => files,
        Err(e) => return stream::once(async move { Err(e) }).boxed(),
    };

    stream::iter(files)
        .then(move |file| {
            let target = file.dest_in(&dest);
            async move { fs::copy(&file.path, &target).await }
        })
        .boxed()
}
