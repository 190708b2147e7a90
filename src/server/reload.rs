//! Live-reload channel

use tokio::sync::broadcast;
use tracing::debug;

use crate::events::{self, EventSink, PipelineEvent};

const CHANNEL_CAPACITY: usize = 64;

/// A notification pushed to connected browsers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadMessage {
    /// Reload the whole page
    Reload,
    /// Swap a stylesheet in place; path is relative to the build root
    Css(String),
    /// A script changed; clients reload the page
    Js(String),
}

impl ReloadMessage {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            ReloadMessage::Reload => "reload",
            ReloadMessage::Css(_) => "css",
            ReloadMessage::Js(_) => "js",
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            ReloadMessage::Reload => None,
            ReloadMessage::Css(path) | ReloadMessage::Js(path) => Some(path),
        }
    }
}

/// Cloneable handle for publishing live-reload notifications.
///
/// Publishing with nobody subscribed is a no-op.
#[derive(Clone)]
pub struct LiveReload {
    tx: broadcast::Sender<ReloadMessage>,
    sink: EventSink,
}

impl Default for LiveReload {
    fn default() -> Self {
        Self::new(events::discard())
    }
}

impl std::fmt::Debug for LiveReload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveReload")
            .field("clients", &self.tx.receiver_count())
            .finish()
    }
}

impl LiveReload {
    pub fn new(sink: EventSink) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx, sink }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.tx.subscribe()
    }

    /// Number of connected clients
    pub fn clients(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn reload(&self) {
        self.publish(ReloadMessage::Reload);
    }

    pub fn css(&self, path: impl Into<String>) {
        self.publish(ReloadMessage::Css(path.into()));
    }

    pub fn js(&self, path: impl Into<String>) {
        self.publish(ReloadMessage::Js(path.into()));
    }

    pub fn publish(&self, message: ReloadMessage) {
        debug!(kind = message.kind(), path = ?message.path(), clients = self.clients(), "live reload");
        (self.sink)(PipelineEvent::ReloadPushed {
            kind: message.kind().to_string(),
            path: message.path().map(str::to_string),
        });
        // Err only means nobody is listening
        let _ = self.tx.send(message);
    }
}
