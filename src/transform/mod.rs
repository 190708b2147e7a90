//! Transform backends
//!
//! Pure functions from input bytes to output bytes. The asset tasks in
//! [`crate::tasks`] own file selection and I/O; everything here only knows
//! about the content it is handed.

pub mod image;
pub mod markup;
pub mod script;
pub mod sprite;
pub mod style;
pub mod svg;
pub mod webp;

pub use self::image::{optimize_image, ImageKind};
pub use self::markup::minify_markup;
pub use self::script::minify_script;
pub use self::sprite::{build_sprite, Icon};
pub use self::style::{
    finish_css, ByExtension, CssOptions, CssOutput, LessCompiler, PlainCss, StyleCompiler,
};
pub use self::svg::optimize_svg;
pub use self::webp::{encode_webp, webp_sibling};

/// Insert `.min` before the extension: `app.js` -> `app.min.js`
pub fn min_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}.min.{ext}"),
        _ => format!("{file_name}.min"),
    }
}
