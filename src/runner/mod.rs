//! Task runner
//!
//! Normalizes every [`TaskKind`] into a single future:
//! - `Sync` actions hop to the blocking pool
//! - `Stream` tasks are drained, failing on the first error item
//! - `Callback` tasks complete when their [`Done`] handle fires
//! - `Series` stops at the first failure; `Parallel` waits for every member
//!   and returns the first failure in declaration order

mod task;

use std::sync::Arc;
use std::time::Instant;

use futures::future::{join_all, BoxFuture};
use futures::{FutureExt, StreamExt};
use tracing::{debug, error, info, warn};

use crate::error::{SitepipeError, SitepipeResult};
use crate::events::{self, EventSink, PipelineEvent};

pub use task::{isolate, parallel, series, Done, Task, TaskKind};

/// Executes tasks and reports their progress
#[derive(Clone)]
pub struct Runner {
    sink: EventSink,
}

impl Default for Runner {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

impl Runner {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    /// Runner that only logs
    pub fn silent() -> Self {
        Self::new(events::discard())
    }

    pub fn sink(&self) -> EventSink {
        Arc::clone(&self.sink)
    }

    pub fn emit(&self, event: PipelineEvent) {
        (self.sink)(event);
    }

    /// Run a task (and everything it is composed of) to completion
    pub fn run<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, SitepipeResult<()>> {
        async move {
            match task.kind() {
                TaskKind::Series(tasks) => {
                    for member in tasks {
                        self.run(member).await?;
                    }
                    Ok(())
                }
                TaskKind::Parallel(tasks) => {
                    let results = join_all(tasks.iter().map(|member| self.run(member))).await;
                    results.into_iter().collect::<SitepipeResult<Vec<()>>>()?;
                    Ok(())
                }
                TaskKind::Isolated(inner) => {
                    if let Err(err) = self.run(inner).await {
                        warn!(task = task.name(), error = %err, "isolated task failed");
                        self.emit(PipelineEvent::TaskIsolated {
                            task: task.name().to_string(),
                            message: err.to_string(),
                        });
                    }
                    Ok(())
                }
                _ => self.run_leaf(task).await,
            }
        }
        .boxed()
    }

    async fn run_leaf(&self, task: &Task) -> SitepipeResult<()> {
        let name = task.name().to_string();
        debug!(task = %name, "starting");
        self.emit(PipelineEvent::TaskStarted { task: name.clone() });

        let started = Instant::now();
        match execute(task).await {
            Ok(written) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!(task = %name, written, elapsed_ms, "finished");
                self.emit(PipelineEvent::TaskFinished {
                    task: name,
                    written,
                    elapsed_ms,
                });
                Ok(())
            }
            Err(err) => {
                error!(task = %name, error = %err, "failed");
                self.emit(PipelineEvent::TaskFailed {
                    task: name,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

/// Run a leaf task, returning how many files it wrote
async fn execute(task: &Task) -> SitepipeResult<usize> {
    match task.kind() {
        TaskKind::Sync(action) => {
            let action = Arc::clone(action);
            match tokio::task::spawn_blocking(move || action()).await {
                Ok(result) => result.map(|written| written.len()),
                Err(_) => Err(SitepipeError::TaskPanicked {
                    task: task.name().to_string(),
                }),
            }
        }
        TaskKind::Async(action) => action().await.map(|()| 0),
        TaskKind::Stream(action) => {
            let mut stream = action();
            let mut written = 0;
            while let Some(item) = stream.next().await {
                let path = item?;
                debug!(task = task.name(), path = %path.display(), "wrote");
                written += 1;
            }
            Ok(written)
        }
        TaskKind::Callback(action) => {
            let (done, completion) = Done::channel();
            action(done);
            match completion.await {
                Ok(result) => result.map(|()| 0),
                Err(_) => Err(SitepipeError::NoCompletion {
                    task: task.name().to_string(),
                }),
            }
        }
        TaskKind::Series(_) | TaskKind::Parallel(_) | TaskKind::Isolated(_) => {
            unreachable!("compositions are handled by Runner::run")
        }
    }
}
