//! Scenario: Config Mistakes
//!
//! Journey: a developer edits `sitepipe.toml` by hand and gets something
//! wrong.
//!
//! Success Criteria:
//! - Typos in keys warn but do not stop the build
//! - Invalid TOML stops with the file name in the error
//! - A missing explicit `--config` is an error, not silently ignored

use crate::common::*;

#[test]
fn scenario_unknown_key_warns_with_suggestion() {
    let site = SiteFixture::with_css_entry();
    site.write_config("[styles]\nentry = \"css/style.css\"\nsource_map = false\n");

    let result = sitepipe(site.root(), &["run", "styles"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(
        result.stderr.contains("unknown config key 'source_map'"),
        "{}",
        result.stderr
    );
    assert!(result.stderr.contains("source_maps"), "{}", result.stderr);
}

#[test]
fn scenario_invalid_toml_is_fatal() {
    let site = SiteFixture::with_css_entry();
    site.write_config("[styles\nentry = 1\n");

    let result = sitepipe(site.root(), &["build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("sitepipe.toml"), "{}", result.stderr);
    assert!(!site.build_dir().exists());
}

#[test]
fn scenario_missing_explicit_config() {
    let site = SiteFixture::with_css_entry();

    let result = sitepipe(site.root(), &["--config", "nope.toml", "build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("nope.toml"), "{}", result.stderr);
}

#[test]
fn scenario_custom_paths() {
    let site = SiteFixture::with_css_entry();
    site.write_config("[paths]\nbuild = \"public\"\n\n[styles]\nentry = \"css/style.css\"\n");

    let result = sitepipe(site.root(), &["build"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(site.root().join("public/index.html").exists());
    assert!(!site.build_dir().exists());
}
