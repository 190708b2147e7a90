//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SitepipeResult;

use super::loader::{self, ConfigWarning};

/// Default config file name, looked up in the project root
pub const CONFIG_FILE: &str = "sitepipe.toml";

/// Source and destination roots, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub build: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("source"),
            build: PathBuf::from("build"),
        }
    }
}

/// Stylesheet pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Entry stylesheet, relative to the source root
    pub entry: PathBuf,
    /// Output file name inside `<build>/css`
    pub output: String,
    pub source_maps: bool,
    /// Browserslist queries used for prefixing
    pub browsers: Vec<String>,
    /// Program used to compile `.less` entries
    pub lessc: String,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("less/style.less"),
            output: "style.min.css".to_string(),
            source_maps: true,
            browsers: vec!["defaults".to_string()],
            lessc: "lessc".to_string(),
        }
    }
}

/// Image codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// oxipng preset (0-6)
    pub png_level: u8,
    pub jpeg_quality: u8,
    pub webp_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            png_level: 2,
            jpeg_quality: 75,
            webp_quality: 90,
        }
    }
}

/// Dev server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// `0` picks an ephemeral port
    pub port: u16,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SitepipeResult<Self> {
        let (config, _) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> SitepipeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the config for a project root.
    ///
    /// An explicit path must exist; otherwise `<root>/sitepipe.toml` is used
    /// when present and defaults apply when it is not. Environment overrides
    /// are applied last.
    pub fn resolve(
        root: &Path,
        explicit: Option<&Path>,
    ) -> SitepipeResult<(Self, Vec<ConfigWarning>)> {
        loader::resolve(root, explicit)
    }

    /// Apply `SITEPIPE_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
