//! JavaScript minification

use std::path::Path;

use minify_js::{minify, Session, TopLevelMode};

use crate::error::{SitepipeError, SitepipeResult};

/// Minify a classic (non-module) script.
///
/// Top-level names stay intact since other scripts on the page may use them.
pub fn minify_script(file: &Path, source: &[u8]) -> SitepipeResult<Vec<u8>> {
    let session = Session::new();
    let mut out = Vec::with_capacity(source.len());
    minify(&session, TopLevelMode::Global, source, &mut out)
        .map_err(|e| SitepipeError::transform("minify-js", file, format!("{e:?}")))?;
    Ok(out)
}
