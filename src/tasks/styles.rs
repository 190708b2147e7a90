use std::path::PathBuf;

use tracing::debug;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::transform::{finish_css, CssOptions};

use super::{url_path, TaskContext};

/// Compile, prefix and minify the entry stylesheet into `css/`
pub fn styles(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("styles", move || compile(&ctx))
}

fn compile(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let settings = &ctx.config.styles;
    let entry = ctx.source_dir().join(&settings.entry);
    debug!(entry = %entry.display(), "compiling stylesheet");

    let css = ctx.styles.compile(&entry)?;
    let filename = compiled_name(&settings.entry.to_string_lossy().replace('\\', "/"));
    let out = finish_css(
        &css,
        &CssOptions {
            filename: &filename,
            browsers: &settings.browsers,
            source_map: settings.source_maps,
        },
    )?;

    let css_dir = ctx.build_dir().join("css");
    let css_path = css_dir.join(&settings.output);
    let mut code = out.code;
    let mut written = Vec::new();

    if let Some(map) = out.map {
        let map_name = format!("{}.map", settings.output);
        code.push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));
        written.push(fs::write(&css_dir.join(&map_name), map)?);
    }
    written.insert(0, fs::write(&css_path, code)?);

    ctx.reload.css(url_path(&ctx.build_dir(), &css_path));
    Ok(written)
}

/// Name the map's source after what it holds: the compiler output.
///
/// `less/style.less` becomes `less/style.less.css`; CSS entries keep their name.
fn compiled_name(entry: &str) -> String {
    if entry.ends_with(".css") {
        entry.to_string()
    } else {
        format!("{entry}.css")
    }
}
