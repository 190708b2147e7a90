//! Pipeline progress events
//!
//! Every task transition, server start and watch notification is reported as
//! a [`PipelineEvent`] through an [`EventSink`]. The CLI prints them either as
//! NDJSON (`--json`) or as human-readable lines.

use std::sync::Arc;

use serde::Serialize;

/// Callback receiving pipeline events
pub type EventSink = Arc<dyn Fn(PipelineEvent) + Send + Sync>;

/// Sink that drops every event
pub fn discard() -> EventSink {
    Arc::new(|_| {})
}

/// Pipeline event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    TaskStarted {
        task: String,
    },
    TaskFinished {
        task: String,
        written: usize,
        elapsed_ms: u64,
    },
    TaskFailed {
        task: String,
        message: String,
    },
    /// A failure swallowed by an isolating wrapper
    TaskIsolated {
        task: String,
        message: String,
    },
    ServerStarted {
        url: String,
    },
    WatchStarted {
        source: String,
    },
    FileChanged {
        path: String,
    },
    /// A live-reload notification went out to connected browsers
    ReloadPushed {
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Shutdown,
}

impl PipelineEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// True for events that describe a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            PipelineEvent::TaskFailed { .. } | PipelineEvent::TaskIsolated { .. }
        )
    }
}
