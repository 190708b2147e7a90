//! Scenario: Running One Task
//!
//! Journey: a developer only touched scripts and runs `sitepipe run scripts`.
//!
//! Success Criteria:
//! - Only the scripts output appears
//! - A typo in the task name is a clear error

use crate::common::*;

#[test]
fn scenario_run_single_task() {
    let site = SiteFixture::with_css_entry();

    let result = sitepipe(site.root(), &["run", "scripts"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(listing(&site.build_dir()), vec!["js/app.min.js", "js/menu.min.js"]);
}

#[test]
fn scenario_run_unknown_task() {
    let site = SiteFixture::with_css_entry();

    let result = sitepipe(site.root(), &["run", "deploy"]);

    assert!(!result.success);
    assert!(result.stderr.contains("unknown task 'deploy'"), "{}", result.stderr);
    assert!(!site.build_dir().exists());
}

#[test]
fn scenario_run_styles_with_less_compiler_missing() {
    let site = SiteFixture::new();
    site.write_config("[styles]\nlessc = \"sitepipe-no-such-lessc\"\n");

    let result = sitepipe(site.root(), &["run", "styles"]);

    assert!(!result.success);
    assert!(result.stderr.contains("not found"), "{}", result.stderr);
}
