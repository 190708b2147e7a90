//! Property tests for source selection globs.

use std::path::PathBuf;

use proptest::prelude::*;

use sitepipe::source::Globs;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a single `*` never crosses a directory boundary.
    #[test]
    fn property_star_stays_in_directory(
        dirs in proptest::collection::vec(segment(), 1..4),
        name in segment(),
    ) {
        let globs = Globs::new(["*.html"]).unwrap();
        let nested: PathBuf = dirs.iter().collect::<PathBuf>().join(format!("{name}.html"));
        let top = PathBuf::from(format!("{name}.html"));

        prop_assert!(globs.is_match(&top));
        prop_assert!(!globs.is_match(&nested));
    }

    /// PROPERTY: `**` matches at any depth.
    #[test]
    fn property_double_star_matches_any_depth(
        dirs in proptest::collection::vec(segment(), 0..4),
        name in segment(),
    ) {
        let globs = Globs::new(["img/**/*.png"]).unwrap();
        let path = PathBuf::from("img")
            .join(dirs.iter().collect::<PathBuf>())
            .join(format!("{name}.png"));

        prop_assert!(globs.is_match(&path));
    }

    /// PROPERTY: an exclusion always wins over an inclusion.
    #[test]
    fn property_exclusion_wins(name in segment()) {
        let globs = Globs::new(["img/**/*.svg", "!img/icons/*.svg"]).unwrap();

        let loose = PathBuf::from(format!("img/{name}.svg"));
        let icon = PathBuf::from(format!("img/icons/{name}.svg"));

        prop_assert!(globs.is_match(&loose));
        prop_assert!(!globs.is_match(&icon));
    }

    /// PROPERTY: compiling arbitrary patterns never panics.
    #[test]
    fn property_globs_never_panic(patterns in proptest::collection::vec("(?s).{0,24}", 0..4)) {
        let _ = Globs::new(&patterns);
    }
}
