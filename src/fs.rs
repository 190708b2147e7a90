//! File helpers shared by the asset tasks
//!
//! Every read and write goes through here so errors carry the offending path.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{SitepipeError, SitepipeResult};

/// Read a file as bytes
pub fn read(path: &Path) -> SitepipeResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| read_error(path, source))
}

/// Read a file as UTF-8 text
pub fn read_to_string(path: &Path) -> SitepipeResult<String> {
    std::fs::read_to_string(path).map_err(|source| read_error(path, source))
}

/// Write a file, creating parent directories as needed
pub fn write(path: &Path, content: impl AsRef<[u8]>) -> SitepipeResult<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SitepipeError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| SitepipeError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Copy a file asynchronously, creating parent directories as needed
pub async fn copy(from: &Path, to: &Path) -> SitepipeResult<PathBuf> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SitepipeError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::copy(from, to)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound if !from.exists() => SitepipeError::MissingSource {
                path: from.to_path_buf(),
            },
            _ => SitepipeError::Write {
                path: to.to_path_buf(),
                source,
            },
        })?;
    Ok(to.to_path_buf())
}

/// SHA256 of content, formatted as `sha256:<hex>`
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

fn read_error(path: &Path, source: std::io::Error) -> SitepipeError {
    if source.kind() == std::io::ErrorKind::NotFound {
        SitepipeError::MissingSource {
            path: path.to_path_buf(),
        }
    } else {
        SitepipeError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
