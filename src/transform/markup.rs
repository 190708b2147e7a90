//! HTML minification

use minify_html::{minify, Cfg};

/// Collapse whitespace in an HTML document.
///
/// Comments, closing tags and the `<html>`/`<head>` opening tags survive;
/// inline CSS and JS are left alone.
pub fn minify_markup(html: &[u8]) -> Vec<u8> {
    let mut cfg = Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = true;
    cfg.minify_css = false;
    cfg.minify_js = false;
    minify(html, &cfg)
}
