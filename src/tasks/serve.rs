use tracing::debug;

use crate::events::PipelineEvent;
use crate::runner::Task;
use crate::server::{DevServer, ServerSlot};

use super::TaskContext;

/// Start the dev server over the build root.
///
/// Completes once the listener is bound; the running server is parked in
/// `slot` and keeps serving until it is taken out and stopped.
pub fn serve(ctx: &TaskContext, slot: ServerSlot) -> Task {
    let ctx = ctx.clone();
    Task::callback("server", move |done| {
        let ctx = ctx.clone();
        let slot = slot.clone();
        tokio::spawn(async move {
            match DevServer::start(&ctx.config.server, ctx.build_dir(), ctx.reload.clone()).await {
                Ok(server) => {
                    debug!(url = %server.url(), "serving build directory");
                    ctx.emit(PipelineEvent::ServerStarted { url: server.url() });
                    let previous = slot.lock().await.replace(server);
                    if let Some(previous) = previous {
                        let _ = previous.stop().await;
                    }
                    done.ok();
                }
                Err(e) => done.fail(e),
            }
        });
    })
}
