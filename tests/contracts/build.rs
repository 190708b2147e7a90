//! Contracts for the production build

use std::sync::Arc;

use sitepipe::{pipeline, Config, PipelineEvent, Runner, TaskContext};

use crate::common::*;

fn context(site: &SiteFixture, sink: sitepipe::EventSink) -> TaskContext {
    TaskContext::new(Config::default(), site.root(), sink).with_style_compiler(FakeLess)
}

async fn build(site: &SiteFixture) -> sitepipe::SitepipeResult<()> {
    let ctx = context(site, sitepipe::events::discard());
    Runner::silent().run(&pipeline::build(&ctx)).await
}

/// CONTRACT: a build produces exactly the documented output tree
#[tokio::test]
async fn contract_build_output_tree() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();

    assert_eq!(
        listing(&site.build_dir()),
        vec![
            "about.html",
            "css/style.min.css",
            "css/style.min.css.map",
            "favicon.ico",
            "fonts/body.woff",
            "fonts/body.woff2",
            "img/gallery/pic.jpg",
            "img/gallery/pic.webp",
            "img/icons/cart.svg",
            "img/icons/close.svg",
            "img/icons/menu.svg",
            "img/logo.svg",
            "img/photo.png",
            "img/photo.webp",
            "img/sprite.svg",
            "index.html",
            "js/app.min.js",
            "js/menu.min.js",
        ]
    );
}

/// CONTRACT: nothing from a previous build survives
#[tokio::test]
async fn contract_build_starts_from_clean_slate() {
    let site = SiteFixture::new();
    site.write_build("stale.txt", "old");
    site.write_build("img/removed.png", png_bytes());

    build(&site).await.unwrap();

    assert!(!site.build("stale.txt").exists());
    assert!(!site.build("img/removed.png").exists());
    assert!(site.build("index.html").exists());
}

/// CONTRACT: building twice from unchanged sources is byte-identical
#[tokio::test]
async fn contract_build_is_idempotent() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();
    let first = snapshot(&site.build_dir());
    build(&site).await.unwrap();
    let second = snapshot(&site.build_dir());

    assert_eq!(first.keys().collect::<Vec<_>>(), second.keys().collect::<Vec<_>>());
    for (path, bytes) in &first {
        assert!(bytes == &second[path], "{path} changed between builds");
    }
}

/// CONTRACT: the source tree is never modified
#[tokio::test]
async fn contract_build_leaves_sources_untouched() {
    let site = SiteFixture::new();
    let before = snapshot(&site.source_dir());

    build(&site).await.unwrap();

    assert_eq!(before, snapshot(&site.source_dir()));
}

/// CONTRACT: one symbol per icon, each id taken from the file stem
#[tokio::test]
async fn contract_sprite_has_a_symbol_per_icon() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();

    let sprite = std::fs::read_to_string(site.build("img/sprite.svg")).unwrap();
    assert_eq!(sprite.matches("<symbol").count(), 3);
    for id in ["cart", "close", "menu"] {
        assert!(sprite.contains(&format!("id=\"{id}\"")), "{sprite}");
    }
}

/// CONTRACT: every raster image gets a decodable WebP sibling
#[tokio::test]
async fn contract_webp_sibling_per_raster_image() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();

    for path in ["img/photo.webp", "img/gallery/pic.webp"] {
        let bytes = std::fs::read(site.build(path)).unwrap();
        assert_eq!(&bytes[..4], b"RIFF", "{path}");
        assert_eq!(&bytes[8..12], b"WEBP", "{path}");
    }
    assert!(!site.build("img/logo.webp").exists());
}

/// CONTRACT: optimized images stay decodable; PNGs never grow, JPEGs turn progressive
#[tokio::test]
async fn contract_images_are_recompressed() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();

    let png = std::fs::read(site.build("img/photo.png")).unwrap();
    assert!(png.len() <= png_bytes().len());
    image::load_from_memory(&png).unwrap();

    let jpg = std::fs::read(site.build("img/gallery/pic.jpg")).unwrap();
    assert!(
        jpg.windows(2).any(|w| w == [0xFF, 0xC2]),
        "jpeg should be progressive"
    );
    image::load_from_memory(&jpg).unwrap();

    let logo = std::fs::read_to_string(site.build("img/logo.svg")).unwrap();
    assert!(!logo.contains("<!--"));
    assert!(!logo.contains("<?xml"));
}

/// CONTRACT: stylesheet output is minified and points at its map
#[tokio::test]
async fn contract_styles_minified_with_map() {
    let site = SiteFixture::new();

    build(&site).await.unwrap();

    let css = std::fs::read_to_string(site.build("css/style.min.css")).unwrap();
    assert!(css.starts_with("body{margin:0}.box{color:red}"), "{css}");
    assert!(css.contains("/*# sourceMappingURL=style.min.css.map */"));
    let map: serde_json::Value =
        serde_json::from_slice(&std::fs::read(site.build("css/style.min.css.map")).unwrap())
            .unwrap();
    assert_eq!(map["version"], 3);
}

/// CONTRACT: a failing stage stops the series before later stages start
#[tokio::test]
async fn contract_failure_stops_later_stages() {
    let site = SiteFixture::new();
    site.write_source("img/broken.png", "not a png");
    let (sink, events) = recorder();
    let ctx = context(&site, Arc::clone(&sink));

    let result = Runner::new(sink).run(&pipeline::build(&ctx)).await;

    assert!(result.is_err());
    assert_eq!(
        count(&events, |e| matches!(e, PipelineEvent::TaskFailed { task, .. } if task == "images")),
        1
    );
    for later in ["styles", "markup", "scripts", "sprite", "webp"] {
        assert_eq!(
            count(&events, |e| matches!(e, PipelineEvent::TaskStarted { task } if task == later)),
            0,
            "{later} should not start"
        );
    }
    assert!(!site.build("index.html").exists());
    assert!(!site.build("css").exists());
}

/// CONTRACT: a stylesheet error fails the build
#[tokio::test]
async fn contract_style_error_fails_build() {
    let site = SiteFixture::new();
    site.write_source("less/style.less", "@error");

    let err = build(&site).await.unwrap_err();

    assert!(err.to_string().contains("style.less"), "{err}");
}
