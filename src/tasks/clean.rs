use std::path::PathBuf;

use tracing::debug;

use crate::error::{SitepipeError, SitepipeResult};
use crate::runner::Task;

use super::TaskContext;

/// Delete the build root; a missing directory counts as clean
pub fn clean(ctx: &TaskContext) -> Task {
    let ctx = ctx.clone();
    Task::future("clean", move || remove_build_dir(ctx.build_dir(), ctx.source_dir()))
}

async fn remove_build_dir(build: PathBuf, source_dir: PathBuf) -> SitepipeResult<()> {
    if source_dir.starts_with(&build) {
        return Err(SitepipeError::Clean {
            path: build,
            source: std::io::Error::other("build directory contains the source tree"),
        });
    }

    match tokio::fs::remove_dir_all(&build).await {
        Ok(()) => {
            debug!(path = %build.display(), "removed build directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SitepipeError::Clean { path: build, source }),
    }
}
