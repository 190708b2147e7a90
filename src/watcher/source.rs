//! Change sources
//!
//! [`ChangeSource`] is the capability the watch loop depends on: subscribe to
//! a directory, receive a stream of changed paths. [`NotifySource`] uses the
//! platform's native notification API; [`ChannelSource`] is fed by hand.

use std::any::Any;
use std::path::Path;
use std::sync::Mutex;

use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{SitepipeError, SitepipeResult};

use super::event::ChangeEvent;

/// Something that reports file changes under a directory
pub trait ChangeSource: Send + Sync {
    fn subscribe(&self, root: &Path) -> SitepipeResult<Subscription>;
}

/// Receiving end of a subscription.
///
/// Holds whatever keeps the backend alive; dropping it ends the watch.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    _guard: Box<dyn Any + Send>,
}

impl Subscription {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent>, guard: impl Any + Send) -> Self {
        Self {
            rx,
            _guard: Box::new(guard),
        }
    }

    /// Next change; `None` once the source is gone
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Native filesystem notifications via `notify`
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifySource;

impl ChangeSource for NotifySource {
    fn subscribe(&self, root: &Path) -> SitepipeResult<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else {
                return;
            };
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            for path in event.paths {
                let _ = tx.send(ChangeEvent { path });
            }
        })
        .map_err(|e| SitepipeError::Watch(e.to_string()))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| SitepipeError::Watch(format!("{}: {e}", root.display())))?;

        Ok(Subscription::new(rx, watcher))
    }
}

/// A source fed through a channel; subscribing twice is an error
#[derive(Debug)]
pub struct ChannelSource {
    rx: Mutex<Option<mpsc::UnboundedReceiver<ChangeEvent>>>,
}

impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<ChangeEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                rx: Mutex::new(Some(rx)),
            },
        )
    }
}

impl ChangeSource for ChannelSource {
    fn subscribe(&self, _root: &Path) -> SitepipeResult<Subscription> {
        let rx = self
            .rx
            .lock()
            .map_err(|_| SitepipeError::Watch("change source lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| SitepipeError::Watch("change source already subscribed".to_string()))?;
        Ok(Subscription::new(rx, ()))
    }
}
