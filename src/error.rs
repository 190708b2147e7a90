//! Error types for sitepipe
//!
//! Library code returns `SitepipeResult`; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sitepipe operations
pub type SitepipeResult<T> = Result<T, SitepipeError>;

/// Main error type for sitepipe operations
#[derive(Error, Debug)]
pub enum SitepipeError {
    /// Reading a source file failed
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required source file does not exist
    #[error("source file not found: {path}")]
    MissingSource { path: PathBuf },

    /// Removing the build directory failed
    #[error("failed to clean {path}: {source}")]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    /// A compiler, minifier or codec rejected its input
    #[error("{stage} failed for {file}: {message}")]
    Transform {
        stage: &'static str,
        file: PathBuf,
        message: String,
    },

    /// Invalid configuration file
    #[error("invalid config {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Filesystem watcher failure
    #[error("watch error: {0}")]
    Watch(String),

    /// Dev server failure
    #[error("dev server error: {0}")]
    Server(String),

    /// Callback-style task dropped its completion handle
    #[error("task '{task}' finished without signalling completion")]
    NoCompletion { task: String },

    /// Task panicked while running
    #[error("task '{task}' panicked")]
    TaskPanicked { task: String },

    /// Unknown task name requested
    #[error("unknown task '{name}'")]
    UnknownTask { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SitepipeError {
    pub(crate) fn transform(
        stage: &'static str,
        file: impl Into<PathBuf>,
        message: impl ToString,
    ) -> Self {
        SitepipeError::Transform {
            stage,
            file: file.into(),
            message: message.to_string(),
        }
    }
}
