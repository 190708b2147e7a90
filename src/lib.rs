//! sitepipe - static-asset build pipeline
//!
//! Compiles stylesheets, minifies markup and scripts, optimizes images,
//! produces WebP siblings and an SVG sprite, then serves the output with
//! live-reload and rebuilds on change.
//!
//! Work is expressed as [`Task`]s composed with [`series`] and [`parallel`]
//! and executed by a [`Runner`]; [`pipeline`] holds the two stock
//! compositions.

pub mod config;
pub mod error;
pub mod events;
pub mod fs;
pub mod pipeline;
pub mod runner;
pub mod server;
pub mod source;
pub mod tasks;
pub mod transform;
pub mod watcher;

// Re-exports for convenience
pub use config::Config;
pub use error::{SitepipeError, SitepipeResult};
pub use events::{EventSink, PipelineEvent};
pub use runner::{isolate, parallel, series, Done, Runner, Task, TaskKind};
pub use server::{DevServer, LiveReload, ServerSlot};
pub use tasks::TaskContext;
pub use watcher::{watch, ChangeEvent, ChangeSource, ChannelSource, NotifySource, WatchBinding};
