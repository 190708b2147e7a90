//! Scenario: First Production Build
//!
//! Journey: a developer with an existing site tree runs `sitepipe build`.
//!
//! Steps:
//! 1. Lists the available tasks
//! 2. Runs a build with human output
//! 3. Runs it again with `--json` for CI
//!
//! Success Criteria:
//! - Build succeeds and fills the build root
//! - JSON output is one event per line, ending with the last task

use crate::common::*;

/// SCENARIO: build a site with a plain CSS entry
#[test]
fn scenario_first_build_human_output() {
    let site = SiteFixture::with_css_entry();

    let tasks = sitepipe(site.root(), &["tasks"]);
    assert!(tasks.success, "{}", tasks.combined_output());
    assert!(tasks.stdout.lines().any(|l| l == "styles"));

    let result = sitepipe(site.root(), &["build"]);
    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("styles"), "{}", result.stdout);
    assert!(result.stdout.contains("[OK]"), "{}", result.stdout);

    for path in [
        "css/style.min.css",
        "index.html",
        "js/app.min.js",
        "img/sprite.svg",
        "img/photo.webp",
        "fonts/body.woff2",
        "favicon.ico",
    ] {
        assert!(site.build(path).exists(), "missing {path}");
    }
    assert!(!site.build("fonts/LICENSE.txt").exists());
}

/// SCENARIO: CI runs the build with machine-readable output
#[test]
fn scenario_first_build_json_output() {
    let site = SiteFixture::with_css_entry();

    let result = sitepipe(site.root(), &["build", "--json"]);
    assert!(result.success, "{}", result.combined_output());

    let events = result.json_lines();
    assert!(!events.is_empty());
    assert_eq!(events[0]["event"], "task_started");
    assert_eq!(events[0]["task"], "clean");

    let finished: Vec<&str> = events
        .iter()
        .filter(|e| e["event"] == "task_finished")
        .filter_map(|e| e["task"].as_str())
        .collect();
    for task in ["clean", "copy", "images", "styles", "markup", "scripts", "sprite", "webp"] {
        assert!(finished.contains(&task), "{task} did not finish: {finished:?}");
    }
    assert!(events.iter().all(|e| e["event"] != "task_failed"));
}

/// SCENARIO: a broken image fails the build with a non-zero exit
#[test]
fn scenario_build_failure_exits_non_zero() {
    let site = SiteFixture::with_css_entry();
    site.write_source("img/broken.png", "not a png");

    let result = sitepipe(site.root(), &["build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("Error:"), "{}", result.stderr);
    assert!(result.stderr.contains("broken.png"), "{}", result.stderr);
    assert!(!site.build("index.html").exists());
}
