//! Configuration module for sitepipe
//!
//! Resolution order:
//! 1. Environment variables (SITEPIPE_*)
//! 2. `--config <file>` or `<root>/sitepipe.toml`
//! 3. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::ConfigWarning;
pub use types::{
    Config, ImagesConfig, PathsConfig, ServerConfig, StylesConfig, CONFIG_FILE,
};
