//! Source tree watcher
//!
//! Re-runs tasks when their inputs change:
//! - Debouncing (100ms), changed paths coalesced
//! - Content hashing filters out saves that did not change anything
//! - Bindings run in declaration order; a failing binding is reported and
//!   the watch carries on

mod event;
mod source;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::error::SitepipeResult;
use crate::events::PipelineEvent;
use crate::fs::content_hash;
use crate::runner::{Runner, Task};
use crate::source::Globs;

pub use event::{ChangeEvent, DEBOUNCE_MS};
pub use source::{ChangeSource, ChannelSource, NotifySource, Subscription};

use event::WatcherState;

const POLL_MS: u64 = 50;

/// Glob patterns (relative to the watched root) and the task they trigger
#[derive(Debug, Clone)]
pub struct WatchBinding {
    globs: Globs,
    task: Task,
}

impl WatchBinding {
    pub fn new<I, S>(patterns: I, task: Task) -> SitepipeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            globs: Globs::new(patterns)?,
            task,
        })
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn matches(&self, relative: &Path) -> bool {
        self.globs.is_match(relative)
    }
}

/// Watch `root` and run matching bindings until the change source closes.
///
/// Only subscribing can fail; binding failures are reported through the
/// runner and never end the watch.
pub async fn watch(
    bindings: &[WatchBinding],
    source: &dyn ChangeSource,
    root: &Path,
    runner: &Runner,
) -> SitepipeResult<()> {
    let mut subscription = source.subscribe(root)?;
    let roots = Roots::new(root);
    let mut hashes = prime_hashes(&roots.canonical);
    let mut state = WatcherState::new();

    info!(root = %root.display(), bindings = bindings.len(), "watching");
    runner.emit(PipelineEvent::WatchStarted {
        source: root.display().to_string(),
    });

    loop {
        match tokio::time::timeout(Duration::from_millis(POLL_MS), subscription.recv()).await {
            Ok(Some(change)) => {
                if let Some(relative) = roots.relative(&change.path) {
                    if content_changed(&change.path, &mut hashes) {
                        state.add_change(relative);
                    }
                }
            }
            Ok(None) => {
                debug!("change source closed");
                let changes = state.take_changes();
                dispatch(bindings, &changes, runner).await;
                return Ok(());
            }
            Err(_) => {}
        }

        if state.should_run() {
            let changes = state.take_changes();
            dispatch(bindings, &changes, runner).await;
        }
    }
}

async fn dispatch(bindings: &[WatchBinding], changes: &[PathBuf], runner: &Runner) {
    if changes.is_empty() {
        return;
    }

    for path in changes {
        runner.emit(PipelineEvent::FileChanged {
            path: path.display().to_string(),
        });
    }

    for binding in bindings {
        if changes.iter().any(|path| binding.matches(path)) {
            debug!(task = binding.task.name(), "change matched binding");
            if let Err(err) = runner.run(&binding.task).await {
                warn!(task = binding.task.name(), error = %err, "binding failed; still watching");
            }
        }
    }
}

/// The watched root as given and canonicalized; events may use either form
struct Roots {
    given: PathBuf,
    canonical: PathBuf,
}

impl Roots {
    fn new(root: &Path) -> Self {
        Self {
            given: root.to_path_buf(),
            canonical: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
        }
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        let canonical = path.canonicalize().ok();
        let relative = [canonical.as_deref(), Some(path)]
            .into_iter()
            .flatten()
            .find_map(|p| {
                p.strip_prefix(&self.canonical)
                    .or_else(|_| p.strip_prefix(&self.given))
                    .ok()
            })
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf);
        relative
    }
}

/// Hash every file under `root` so startup events for untouched files are ignored
fn prime_hashes(root: &Path) -> HashMap<PathBuf, String> {
    WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let content = std::fs::read(entry.path()).ok()?;
            Some((key(entry.path()), content_hash(&content)))
        })
        .collect()
}

/// Update the hash for `path`; true when it differs from the last one seen.
///
/// Deleting a known file counts as a change.
fn content_changed(path: &Path, hashes: &mut HashMap<PathBuf, String>) -> bool {
    if path.is_dir() {
        return false;
    }
    let key = key(path);
    match std::fs::read(path) {
        Ok(content) => {
            let hash = content_hash(&content);
            hashes.insert(key, hash.clone()).as_deref() != Some(hash.as_str())
        }
        Err(_) => hashes.remove(&key).is_some(),
    }
}

/// Canonical path, also for files that no longer exist
fn key(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent().and_then(|p| p.canonicalize().ok()), path.file_name()) {
        (Some(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}
