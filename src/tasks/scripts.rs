use std::path::PathBuf;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;
use crate::transform::{min_name, minify_script};

use super::{url_path, TaskContext};

pub const SCRIPT_GLOBS: &[&str] = &["js/*.js"];

/// Minify every script into `js/<name>.min.js`
pub fn scripts(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("scripts", move || minify_all(&ctx))
}

fn minify_all(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let build = ctx.build_dir();
    let mut written = Vec::new();

    for file in SourceSet::new(ctx.source_dir(), SCRIPT_GLOBS)?.files()? {
        let source = fs::read(&file.path)?;
        let minified = minify_script(&file.path, &source)?;

        let name = file
            .relative
            .file_name()
            .map(|n| min_name(&n.to_string_lossy()))
            .unwrap_or_default();
        let dest = file.dest_in(&build).with_file_name(name);
        written.push(fs::write(&dest, minified)?);
        ctx.reload.js(url_path(&build, &dest));
    }

    Ok(written)
}
