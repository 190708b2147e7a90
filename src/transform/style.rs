//! Stylesheet compilation and post-processing
//!
//! Compilation to plain CSS goes through a [`StyleCompiler`]; prefixing,
//! minification and source maps are handled by lightningcss.

use std::path::Path;
use std::process::{Command, Stdio};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;

use crate::error::{SitepipeError, SitepipeResult};

/// Compiles an entry stylesheet to plain CSS
pub trait StyleCompiler: Send + Sync {
    fn compile(&self, entry: &Path) -> SitepipeResult<String>;
}

/// Shells out to the `lessc` compiler
#[derive(Debug, Clone)]
pub struct LessCompiler {
    program: String,
}

impl LessCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if the compiler is installed
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl StyleCompiler for LessCompiler {
    fn compile(&self, entry: &Path) -> SitepipeResult<String> {
        if !entry.exists() {
            return Err(SitepipeError::MissingSource {
                path: entry.to_path_buf(),
            });
        }

        let output = Command::new(&self.program)
            .arg("--no-color")
            .arg(entry)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                let message = if e.kind() == std::io::ErrorKind::NotFound {
                    format!("'{}' not found (install it with `npm i -g less`)", self.program)
                } else {
                    e.to_string()
                };
                SitepipeError::transform("less", entry, message)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SitepipeError::transform("less", entry, stderr.trim()));
        }

        String::from_utf8(output.stdout).map_err(|e| SitepipeError::transform("less", entry, e))
    }
}

/// Reads `.css` entries verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCss;

impl StyleCompiler for PlainCss {
    fn compile(&self, entry: &Path) -> SitepipeResult<String> {
        crate::fs::read_to_string(entry)
    }
}

/// Picks a compiler from the entry's extension
#[derive(Debug, Clone)]
pub struct ByExtension {
    less: LessCompiler,
}

impl ByExtension {
    pub fn new(lessc: impl Into<String>) -> Self {
        Self {
            less: LessCompiler::new(lessc),
        }
    }
}

impl StyleCompiler for ByExtension {
    fn compile(&self, entry: &Path) -> SitepipeResult<String> {
        match entry.extension().and_then(|e| e.to_str()) {
            Some("css") => PlainCss.compile(entry),
            _ => self.less.compile(entry),
        }
    }
}

/// Options for [`finish_css`]
#[derive(Debug, Clone)]
pub struct CssOptions<'a> {
    /// Name recorded in the source map
    pub filename: &'a str,
    /// Browserslist queries
    pub browsers: &'a [String],
    pub source_map: bool,
}

/// Minified stylesheet and optional source map JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Prefix and minify compiled CSS
pub fn finish_css(css: &str, options: &CssOptions<'_>) -> SitepipeResult<CssOutput> {
    let file = Path::new(options.filename);

    let browsers = Browsers::from_browserslist(options.browsers.iter())
        .map_err(|e| SitepipeError::transform("autoprefix", file, e))?;
    let targets = Targets {
        browsers,
        ..Targets::default()
    };

    let mut stylesheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename: options.filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| SitepipeError::transform("css", file, e))?;

    stylesheet
        .minify(MinifyOptions {
            targets: targets.clone(),
            ..MinifyOptions::default()
        })
        .map_err(|e| SitepipeError::transform("minify", file, e))?;

    let mut source_map = if options.source_map {
        let mut map = SourceMap::new("/");
        let index = map.add_source(options.filename);
        map.set_source_content(index as usize, css)
            .map_err(|e| SitepipeError::transform("sourcemap", file, format!("{e:?}")))?;
        Some(map)
    } else {
        None
    };

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            source_map: source_map.as_mut(),
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| SitepipeError::transform("minify", file, e))?;

    let map = match source_map.as_mut() {
        Some(map) => Some(
            map.to_json(None)
                .map_err(|e| SitepipeError::transform("sourcemap", file, format!("{e:?}")))?,
        ),
        None => None,
    };

    Ok(CssOutput {
        code: printed.code,
        map,
    })
}
