//! Task definitions and composition combinators

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::oneshot;

use crate::error::{SitepipeError, SitepipeResult};

type SyncFn = dyn Fn() -> SitepipeResult<Vec<PathBuf>> + Send + Sync;
type AsyncFn = dyn Fn() -> BoxFuture<'static, SitepipeResult<()>> + Send + Sync;
type StreamFn = dyn Fn() -> BoxStream<'static, SitepipeResult<PathBuf>> + Send + Sync;
type CallbackFn = dyn Fn(Done) + Send + Sync;

/// How a task does its work
#[derive(Clone)]
pub enum TaskKind {
    /// Blocking action returning the files it wrote; runs on the blocking pool
    Sync(Arc<SyncFn>),
    /// Future-returning action
    Async(Arc<AsyncFn>),
    /// Stream of written files; done when the stream ends
    Stream(Arc<StreamFn>),
    /// Action that signals completion through a [`Done`] handle
    Callback(Arc<CallbackFn>),
    /// Run in order, stop at the first failure
    Series(Vec<Task>),
    /// Run together, wait for all
    Parallel(Vec<Task>),
    /// Report failures of the inner task without propagating them
    Isolated(Box<Task>),
}

/// A named unit of pipeline work.
///
/// Tasks are cheap to clone and can be run any number of times.
#[derive(Clone)]
pub struct Task {
    name: String,
    kind: TaskKind,
}

impl Task {
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Blocking task returning the files it wrote
    pub fn sync<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> SitepipeResult<Vec<PathBuf>> + Send + Sync + 'static,
    {
        Self::new(name, TaskKind::Sync(Arc::new(action)))
    }

    /// Async task
    pub fn future<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SitepipeResult<()>> + Send + 'static,
    {
        Self::new(name, TaskKind::Async(Arc::new(move || action().boxed())))
    }

    /// Task producing a stream of written files
    pub fn stream<F, S>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = SitepipeResult<PathBuf>> + Send + 'static,
    {
        Self::new(name, TaskKind::Stream(Arc::new(move || action().boxed())))
    }

    /// Callback-style task; must call [`Done::ok`] or [`Done::fail`]
    pub fn callback<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Done) + Send + Sync + 'static,
    {
        Self::new(name, TaskKind::Callback(Arc::new(action)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Names of the leaf tasks, depth first
    pub fn leaves(&self) -> Vec<&str> {
        match &self.kind {
            TaskKind::Series(tasks) | TaskKind::Parallel(tasks) => {
                tasks.iter().flat_map(Task::leaves).collect()
            }
            TaskKind::Isolated(inner) => inner.leaves(),
            _ => vec![self.name.as_str()],
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TaskKind::Sync(_) => "sync",
            TaskKind::Async(_) => "async",
            TaskKind::Stream(_) => "stream",
            TaskKind::Callback(_) => "callback",
            TaskKind::Series(_) => "series",
            TaskKind::Parallel(_) => "parallel",
            TaskKind::Isolated(_) => "isolated",
        };
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// Run `tasks` strictly in order
pub fn series(name: impl Into<String>, tasks: impl IntoIterator<Item = Task>) -> Task {
    Task::new(name, TaskKind::Series(tasks.into_iter().collect()))
}

/// Run `tasks` concurrently and wait for all of them
pub fn parallel(name: impl Into<String>, tasks: impl IntoIterator<Item = Task>) -> Task {
    Task::new(name, TaskKind::Parallel(tasks.into_iter().collect()))
}

/// Wrap `task` so its failure is reported but never propagated
pub fn isolate(task: Task) -> Task {
    Task::new(task.name.clone(), TaskKind::Isolated(Box::new(task)))
}

/// Completion handle handed to callback-style tasks.
///
/// Dropping it without signalling fails the task.
#[derive(Debug)]
pub struct Done {
    tx: oneshot::Sender<SitepipeResult<()>>,
}

impl Done {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<SitepipeResult<()>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal success
    pub fn ok(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Signal failure
    pub fn fail(self, error: SitepipeError) {
        let _ = self.tx.send(Err(error));
    }

    /// Signal with a result
    pub fn finish(self, result: SitepipeResult<()>) {
        let _ = self.tx.send(result);
    }
}
