//! Structural SVG optimization
//!
//! Drops everything a browser ignores when rendering: the XML declaration,
//! doctype, comments, processing instructions, `<metadata>`, editor
//! namespaces (Inkscape, Sodipodi) and whitespace-only text.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{SitepipeError, SitepipeResult};

const EDITOR_PREFIXES: &[&[u8]] = &[b"inkscape", b"sodipodi"];

pub fn optimize_svg(file: &Path, bytes: &[u8]) -> SitepipeResult<Vec<u8>> {
    let text = std::str::from_utf8(bytes).map_err(|e| SitepipeError::transform("svg", file, e))?;
    let mut reader = Reader::from_str(text);
    let mut writer = Writer::new(Vec::with_capacity(bytes.len()));
    let mut skip_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SitepipeError::transform("svg", file, e))?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        let kept = match event {
            Event::Eof => break,
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => None,
            Event::Text(ref t) if t.iter().all(u8::is_ascii_whitespace) => None,
            Event::Start(ref e) if is_dropped_element(e) => {
                skip_depth = 1;
                None
            }
            Event::Empty(ref e) if is_dropped_element(e) => None,
            Event::Start(ref e) => Some(Event::Start(strip_editor_attributes(e))),
            Event::Empty(ref e) => Some(Event::Empty(strip_editor_attributes(e))),
            other => Some(other),
        };

        if let Some(event) = kept {
            writer
                .write_event(event)
                .map_err(|e| SitepipeError::transform("svg", file, e))?;
        }
    }

    Ok(writer.into_inner())
}

fn is_editor_name(name: &[u8]) -> bool {
    let prefix = match name.iter().position(|&b| b == b':') {
        Some(i) => &name[..i],
        None => return false,
    };
    if prefix == b"xmlns" {
        let declared = &name[prefix.len() + 1..];
        return EDITOR_PREFIXES.contains(&declared);
    }
    EDITOR_PREFIXES.contains(&prefix)
}

fn is_dropped_element(element: &BytesStart<'_>) -> bool {
    let name = element.name();
    name.as_ref() == b"metadata" || is_editor_name(name.as_ref())
}

fn strip_editor_attributes(element: &BytesStart<'_>) -> BytesStart<'static> {
    let mut out = element.to_owned().into_owned();
    out.clear_attributes();
    for attr in element.attributes().flatten() {
        if !is_editor_name(attr.key.as_ref()) {
            out.push_attribute((attr.key.as_ref(), attr.value.as_ref()));
        }
    }
    out
}
