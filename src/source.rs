//! Source file selection
//!
//! A [`Globs`] is an allow-list of glob patterns where a leading `!` marks an
//! exclusion. A [`SourceSet`] anchors a `Globs` at a base directory and walks
//! it; selected files keep their path relative to that base, which is also
//! where they land under the destination root.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{SitepipeError, SitepipeResult};

/// Compiled include/exclude glob patterns over relative paths.
///
/// `*` never crosses a `/`; use `**` for recursive matches.
#[derive(Debug, Clone)]
pub struct Globs {
    include: GlobSet,
    exclude: GlobSet,
    patterns: Vec<String>,
}

impl Globs {
    pub fn new<I, S>(patterns: I) -> SitepipeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut all = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let (builder, raw) = match pattern.strip_prefix('!') {
                Some(negated) => (&mut exclude, negated),
                None => (&mut include, pattern),
            };
            let glob = GlobBuilder::new(raw)
                .literal_separator(true)
                .build()
                .map_err(|e| SitepipeError::Glob {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            builder.add(glob);
            all.push(pattern.to_string());
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|e| SitepipeError::Glob {
                pattern: all.join(", "),
                message: e.to_string(),
            })
        };

        Ok(Self {
            include: build(include)?,
            exclude: build(exclude)?,
            patterns: all,
        })
    }

    /// Check a path relative to the glob root
    pub fn is_match(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// A selected source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Absolute (or root-joined) path on disk
    pub path: PathBuf,
    /// Path relative to the set's base directory
    pub relative: PathBuf,
}

impl SourceFile {
    /// Destination path for this file under `dest_root`
    pub fn dest_in(&self, dest_root: &Path) -> PathBuf {
        dest_root.join(&self.relative)
    }
}

/// Globs anchored at a base directory.
#[derive(Debug, Clone)]
pub struct SourceSet {
    base: PathBuf,
    globs: Globs,
}

impl SourceSet {
    pub fn new<I, S>(base: impl Into<PathBuf>, patterns: I) -> SitepipeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            base: base.into(),
            globs: Globs::new(patterns)?,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Walk the base directory and return matching files, sorted by relative path.
    ///
    /// A missing base directory selects nothing.
    pub fn files(&self) -> SitepipeResult<Vec<SourceFile>> {
        if !self.base.is_dir() {
            tracing::debug!(base = %self.base.display(), "source directory missing, nothing selected");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(&self.base)
            .standard_filters(false)
            .follow_links(true)
            .build()
        {
            let entry = entry.map_err(|e| SitepipeError::Read {
                path: self.base.clone(),
                source: std::io::Error::other(e.to_string()),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.base) else {
                continue;
            };
            if self.globs.is_match(relative) {
                files.push(SourceFile {
                    path: entry.path().to_path_buf(),
                    relative: relative.to_path_buf(),
                });
            }
        }

        files.sort();
        Ok(files)
    }
}
