//! Contracts for individually named tasks

use sitepipe::tasks::{self, TASK_NAMES};
use sitepipe::{Config, Runner, SitepipeError, TaskContext};

use crate::common::*;

fn context(site: &SiteFixture) -> TaskContext {
    TaskContext::new(Config::default(), site.root(), sitepipe::events::discard())
        .with_style_compiler(FakeLess)
}

/// CONTRACT: every listed name resolves to a task of that name
#[test]
fn contract_every_task_name_resolves() {
    let site = SiteFixture::empty();
    let ctx = context(&site);

    for name in TASK_NAMES {
        let task = tasks::named(&ctx, name).unwrap();
        assert_eq!(task.name(), *name);
    }
}

#[test]
fn contract_unknown_task_is_rejected() {
    let site = SiteFixture::empty();

    let err = tasks::named(&context(&site), "deploy").unwrap_err();

    assert!(matches!(err, SitepipeError::UnknownTask { name } if name == "deploy"));
}

/// CONTRACT: a single task writes only its own slice of the build root
#[tokio::test]
async fn contract_scripts_task_writes_only_scripts() {
    let site = SiteFixture::new();
    let ctx = context(&site);

    Runner::silent()
        .run(&tasks::named(&ctx, "scripts").unwrap())
        .await
        .unwrap();

    assert_eq!(listing(&site.build_dir()), vec!["js/app.min.js", "js/menu.min.js"]);
    let app = std::fs::read_to_string(site.build("js/app.min.js")).unwrap();
    assert!(app.len() < SCRIPT.len());
    assert!(app.contains("greet"), "top-level names survive: {app}");
}

/// CONTRACT: markup only picks up top-level pages
#[tokio::test]
async fn contract_markup_task_skips_partials() {
    let site = SiteFixture::new();
    let ctx = context(&site);

    Runner::silent()
        .run(&tasks::named(&ctx, "markup").unwrap())
        .await
        .unwrap();

    assert_eq!(listing(&site.build_dir()), vec!["about.html", "index.html"]);
    let about = std::fs::read_to_string(site.build("about.html")).unwrap();
    assert!(about.contains("About us"), "{about}");
}

/// CONTRACT: copy-images is byte-for-byte
#[tokio::test]
async fn contract_copy_images_is_verbatim() {
    let site = SiteFixture::new();
    let ctx = context(&site);

    Runner::silent()
        .run(&tasks::named(&ctx, "copy-images").unwrap())
        .await
        .unwrap();

    let copied = snapshot(&site.build_dir());
    let sources = snapshot(&site.source_dir());
    assert_eq!(copied.len(), 6);
    for (path, bytes) in &copied {
        assert_eq!(bytes, &sources[path], "{path}");
    }
}

/// CONTRACT: clean on a missing build root succeeds
#[tokio::test]
async fn contract_clean_without_build_dir() {
    let site = SiteFixture::new();
    let ctx = context(&site);

    Runner::silent()
        .run(&tasks::named(&ctx, "clean").unwrap())
        .await
        .unwrap();

    assert!(!site.build_dir().exists());
}
