//! Property tests for sprite assembly.

use std::collections::BTreeSet;
use std::path::Path;

use proptest::prelude::*;

use sitepipe::transform::{build_sprite, optimize_svg, Icon};

fn icon_id() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_-]{0,12}").unwrap()
}

fn icon_body(id: &str, size: u8) -> String {
    format!(
        r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="{size}" viewBox="0 0 {size} {size}"><!-- {id} --><rect width="{size}" height="{size}"/></svg>"#
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: one symbol per icon, in input order, and the result is well-formed SVG.
    #[test]
    fn property_sprite_symbol_per_icon(
        ids in proptest::collection::btree_set(icon_id(), 0..12),
        size in 1u8..64,
    ) {
        let ids: Vec<String> = ids.into_iter().collect();
        let icons: Vec<Icon> = ids.iter().map(|id| Icon::new(id.clone(), icon_body(id, size))).collect();

        let sprite = build_sprite(&icons).unwrap();
        let text = String::from_utf8(sprite.clone()).unwrap();

        prop_assert_eq!(text.matches("<symbol").count(), ids.len());
        let mut last = 0;
        for id in &ids {
            let at = text.find(&format!("id=\"{id}\"")).unwrap();
            prop_assert!(at >= last);
            last = at;
        }
        prop_assert!(!text.contains("<!--"));
        prop_assert!(optimize_svg(Path::new("sprite.svg"), &sprite).is_ok());
    }

    /// PROPERTY: symbol ids are exactly the icon ids.
    #[test]
    fn property_sprite_ids_match_icons(ids in proptest::collection::btree_set(icon_id(), 1..8)) {
        let icons: Vec<Icon> = ids.iter().map(|id| Icon::new(id.clone(), icon_body(id, 8))).collect();
        let text = String::from_utf8(build_sprite(&icons).unwrap()).unwrap();

        let found: BTreeSet<String> = text
            .split("<symbol id=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect();
        prop_assert_eq!(found, ids);
    }

    /// PROPERTY: `build_sprite` never panics on arbitrary icon bodies.
    #[test]
    fn property_sprite_never_panics(body in "(?s).{0,200}") {
        let _ = build_sprite(&[Icon::new("x", body)]);
    }
}
