use std::path::PathBuf;

use crate::error::SitepipeResult;
use crate::fs;
use crate::runner::Task;
use crate::source::SourceSet;
use crate::transform::{build_sprite, Icon};

use super::TaskContext;

pub const ICON_GLOBS: &[&str] = &["img/icons/*.svg"];

/// Output path relative to the build root
pub const SPRITE_FILE: &str = "img/sprite.svg";

/// Bundle the icons into `img/sprite.svg`; no icons, no sprite
pub fn sprite(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::sync("sprite", move || assemble(&ctx))
}

fn assemble(ctx: &TaskContext) -> SitepipeResult<Vec<PathBuf>> {
    let files = SourceSet::new(ctx.source_dir(), ICON_GLOBS)?.files()?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let icons = files
        .iter()
        .map(|file| {
            let id = file
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Icon::new(id, fs::read_to_string(&file.path)?))
        })
        .collect::<SitepipeResult<Vec<_>>>()?;

    let sprite = build_sprite(&icons)?;
    Ok(vec![fs::write(&ctx.build_dir().join(SPRITE_FILE), sprite)?])
}
