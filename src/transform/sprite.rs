//! SVG sprite assembly
//!
//! Every icon becomes a `<symbol>` keyed by its id. Root attributes that only
//! make sense on a standalone document (`width`, `height`, `x`, `y`, `id`,
//! `version`, namespace declarations) are dropped from the symbol; prefixed
//! namespace declarations are hoisted to the sprite root instead.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{SitepipeError, SitepipeResult};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const DROPPED_ATTRIBUTES: &[&[u8]] = &[b"width", b"height", b"x", b"y", b"id", b"version"];

/// One icon to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    /// Symbol id, normally the file stem
    pub id: String,
    pub svg: String,
}

impl Icon {
    pub fn new(id: impl Into<String>, svg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            svg: svg.into(),
        }
    }
}

/// Combine icons into a single sprite document, in the given order
pub fn build_sprite(icons: &[Icon]) -> SitepipeResult<Vec<u8>> {
    let mut namespaces = BTreeMap::new();
    let mut body = Writer::new(Vec::new());

    for icon in icons {
        write_symbol(icon, &mut body, &mut namespaces)?;
    }

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS));
    for (key, value) in &namespaces {
        root.push_attribute((key.as_slice(), value.as_slice()));
    }

    let mut out = Writer::new(Vec::new());
    out.write_event(Event::Start(root))
        .map_err(|e| SitepipeError::transform("sprite", "sprite.svg", e))?;
    out.get_mut().extend_from_slice(&body.into_inner());
    out.write_event(Event::End(BytesEnd::new("svg")))
        .map_err(|e| SitepipeError::transform("sprite", "sprite.svg", e))?;

    Ok(out.into_inner())
}

fn write_symbol(
    icon: &Icon,
    out: &mut Writer<Vec<u8>>,
    namespaces: &mut BTreeMap<Vec<u8>, Vec<u8>>,
) -> SitepipeResult<()> {
    let file = format!("{}.svg", icon.id);
    let err = |e: &dyn std::fmt::Display| SitepipeError::transform("sprite", Path::new(&file), e);

    let mut reader = Reader::from_str(&icon.svg);
    let mut depth = 0usize;
    let mut found_root = false;

    loop {
        let event = reader.read_event().map_err(|e| err(&e))?;

        if !found_root {
            match event {
                Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"svg" => {
                    found_root = true;
                    let symbol = symbol_start(e, &icon.id, namespaces);
                    if matches!(event, Event::Empty(_)) {
                        out.write_event(Event::Empty(symbol)).map_err(|e| err(&e))?;
                        return Ok(());
                    }
                    out.write_event(Event::Start(symbol)).map_err(|e| err(&e))?;
                    depth = 1;
                }
                Event::Eof => return Err(err(&"not an SVG document")),
                Event::Start(_) | Event::Empty(_) => return Err(err(&"not an SVG document")),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Eof => return Err(err(&"unexpected end of document")),
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => continue,
            Event::Text(ref t) if t.iter().all(u8::is_ascii_whitespace) => continue,
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    out.write_event(Event::End(BytesEnd::new("symbol")))
                        .map_err(|e| err(&e))?;
                    return Ok(());
                }
            }
            _ => {}
        }
        out.write_event(event).map_err(|e| err(&e))?;
    }
}

fn symbol_start(
    root: &BytesStart<'_>,
    id: &str,
    namespaces: &mut BTreeMap<Vec<u8>, Vec<u8>>,
) -> BytesStart<'static> {
    let mut symbol = BytesStart::new("symbol");
    symbol.push_attribute(("id", id));

    for attr in root.attributes().flatten() {
        let key = attr.key.as_ref();
        if key.starts_with(b"xmlns:") {
            namespaces
                .entry(key.to_vec())
                .or_insert_with(|| attr.value.to_vec());
            continue;
        }
        if key == b"xmlns" || DROPPED_ATTRIBUTES.contains(&key) {
            continue;
        }
        symbol.push_attribute((key, attr.value.as_ref()));
    }
    symbol
}
