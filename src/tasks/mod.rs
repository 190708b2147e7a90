//! Named asset tasks
//!
//! Each task selects its inputs under the source root, runs them through a
//! [`crate::transform`] backend and writes under its own slice of the build
//! root, so members of a `parallel` composition never write the same path.

mod clean;
mod copy;
mod images;
mod markup;
mod scripts;
mod serve;
mod sprite;
mod styles;
mod webp;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{SitepipeError, SitepipeResult};
use crate::events::{EventSink, PipelineEvent};
use crate::runner::Task;
use crate::server::LiveReload;
use crate::transform::{ByExtension, StyleCompiler};

pub use clean::clean;
pub use copy::copy;
pub use images::{copy_images, images, IMAGE_GLOBS};
pub use markup::{markup, MARKUP_GLOBS};
pub use scripts::{scripts, SCRIPT_GLOBS};
pub use serve::serve;
pub use sprite::{sprite, ICON_GLOBS, SPRITE_FILE};
pub use styles::styles;
pub use webp::{webp, WEBP_GLOBS};

/// Tasks addressable by name
pub const TASK_NAMES: &[&str] = &[
    "styles",
    "markup",
    "scripts",
    "images",
    "copy-images",
    "webp",
    "sprite",
    "copy",
    "clean",
];

/// Everything a task needs, shared by every task of a run
#[derive(Clone)]
pub struct TaskContext {
    pub config: Arc<Config>,
    /// Project root that `paths.source` and `paths.build` are relative to
    pub root: PathBuf,
    pub reload: LiveReload,
    pub styles: Arc<dyn StyleCompiler>,
    pub events: EventSink,
}

impl std::fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TaskContext {
    pub fn new(config: Config, root: impl Into<PathBuf>, events: EventSink) -> Self {
        let styles = Arc::new(ByExtension::new(config.styles.lessc.clone()));
        Self {
            config: Arc::new(config),
            root: root.into(),
            reload: LiveReload::new(Arc::clone(&events)),
            styles,
            events,
        }
    }

    /// Replace the stylesheet compiler
    pub fn with_style_compiler(mut self, compiler: impl StyleCompiler + 'static) -> Self {
        self.styles = Arc::new(compiler);
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.paths.source)
    }

    pub fn build_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.paths.build)
    }

    pub fn emit(&self, event: PipelineEvent) {
        (self.events)(event);
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Look up a task by name
pub fn named(ctx: &TaskContext, name: &str) -> SitepipeResult<Task> {
    let task = match name {
        "styles" => styles(ctx),
        "markup" => markup(ctx),
        "scripts" => scripts(ctx),
        "images" => images(ctx),
        "copy-images" => copy_images(ctx),
        "webp" => webp(ctx),
        "sprite" => sprite(ctx),
        "copy" => copy(ctx),
        "clean" => clean(ctx),
        _ => {
            return Err(SitepipeError::UnknownTask {
                name: name.to_string(),
            })
        }
    };
    Ok(task)
}

/// Path relative to the build root with `/` separators, as browsers see it
pub(crate) fn url_path(build: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(build).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
