//! Pipeline compositions
//!
//! - `build`: clean, copy, optimize images, then the transforms in parallel
//! - `dev`: clean, copy, copy images, the transforms in parallel with styles
//!   isolated, then serve and watch until the process ends

use std::sync::Arc;

use crate::error::SitepipeResult;
use crate::runner::{isolate, parallel, series, Runner, Task};
use crate::server::ServerSlot;
use crate::tasks::{
    clean, copy, copy_images, images, markup, scripts, serve, sprite, styles, webp, TaskContext,
    MARKUP_GLOBS, SCRIPT_GLOBS,
};
use crate::watcher::{self, ChangeSource, WatchBinding};

/// Stylesheet sources, relative to the source root
pub const STYLE_GLOBS: &[&str] = &["less/**/*.less"];

/// One-shot production build
pub fn build(ctx: &TaskContext) -> Task {
    series(
        "build",
        [
            clean(ctx),
            copy(ctx),
            images(ctx),
            parallel(
                "transforms",
                [styles(ctx), markup(ctx), scripts(ctx), sprite(ctx), webp(ctx)],
            ),
        ],
    )
}

/// Development workflow; the watch at the end runs until `changes` closes
pub fn dev(
    ctx: &TaskContext,
    changes: Arc<dyn ChangeSource>,
    slot: ServerSlot,
) -> SitepipeResult<Task> {
    Ok(series(
        "default",
        [
            clean(ctx),
            copy(ctx),
            copy_images(ctx),
            parallel(
                "transforms",
                [
                    isolate(styles(ctx)),
                    markup(ctx),
                    scripts(ctx),
                    sprite(ctx),
                    webp(ctx),
                ],
            ),
            series("serve", [serve(ctx, slot), watch(ctx, changes)?]),
        ],
    ))
}

/// Stylesheet edits recompile (failures only reported), page edits re-minify
/// and reload, script edits re-minify.
pub fn default_bindings(ctx: &TaskContext) -> SitepipeResult<Vec<WatchBinding>> {
    Ok(vec![
        WatchBinding::new(STYLE_GLOBS, isolate(styles(ctx)))?,
        WatchBinding::new(MARKUP_GLOBS, series("markup", [markup(ctx), reload(ctx)]))?,
        WatchBinding::new(SCRIPT_GLOBS, scripts(ctx))?,
    ])
}

/// Watch the source root with [`default_bindings`]
pub fn watch(ctx: &TaskContext, changes: Arc<dyn ChangeSource>) -> SitepipeResult<Task> {
    let bindings = Arc::new(default_bindings(ctx)?);
    let root = ctx.source_dir();
    let runner = Runner::new(Arc::clone(&ctx.events));

    Ok(Task::future("watch", move || {
        let bindings = Arc::clone(&bindings);
        let changes = Arc::clone(&changes);
        let root = root.clone();
        let runner = runner.clone();
        async move { watcher::watch(&bindings, changes.as_ref(), &root, &runner).await }
    }))
}

/// Push a full-page reload
fn reload(ctx: &TaskContext) -> Task {
    let live = ctx.reload.clone();
    Task::sync("reload", move || {
        live.reload();
        Ok(Vec::new())
    })
}
