//! Lightweight probing of an SVG's declared size.
//!
//! This reads only the attributes of the root `<svg>` element, which is enough for backends that
//! hand the actual rendering to another program.

use roxmltree::{Document, Node, ParsingOptions};

/// Size assumed for a side that is missing or unparsable.
pub const FALLBACK_SIDE: f64 = 100.0;

/// Intrinsic `(width, height)` of an SVG document.
///
/// A valid `viewBox` wins over `width`/`height`. Unit suffixes `px`, `pt`, `em` and `rem` are
/// stripped before parsing. Each side that cannot be determined falls back to
/// [`FALLBACK_SIDE`]; this never fails.
pub fn probe_intrinsic_size(svg: &[u8]) -> (f64, f64) {
    let text = String::from_utf8_lossy(svg);
    let Some(doc) = parse_document(&text) else {
        return (FALLBACK_SIDE, FALLBACK_SIDE);
    };
    let Some(root) = svg_root(&doc) else {
        return (FALLBACK_SIDE, FALLBACK_SIDE);
    };

    if let Some((w, h)) = root.attribute("viewBox").and_then(parse_view_box) {
        return (w, h);
    }

    let width = root
        .attribute("width")
        .and_then(parse_length)
        .unwrap_or(FALLBACK_SIDE);
    let height = root
        .attribute("height")
        .and_then(parse_length)
        .unwrap_or(FALLBACK_SIDE);
    (width, height)
}

/// Width and height of the root element's `viewBox`, when it is present and valid.
pub fn root_view_box(svg: &[u8]) -> Option<(f64, f64)> {
    let text = String::from_utf8_lossy(svg);
    let doc = parse_document(&text)?;
    svg_root(&doc)?.attribute("viewBox").and_then(parse_view_box)
}

/// Parse a length attribute value, stripping the supported unit suffixes.
pub fn parse_length(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = ["px", "pt", "rem", "em"]
        .iter()
        .find_map(|unit| s.strip_suffix(unit))
        .unwrap_or(s)
        .trim();
    let v = s.parse::<f64>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

fn parse_view_box(raw: &str) -> Option<(f64, f64)> {
    let parts = raw
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();
    if parts.len() != 4 {
        return None;
    }
    let w = parts[2].parse::<f64>().ok()?;
    let h = parts[3].parse::<f64>().ok()?;
    (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w, h))
}

fn parse_document(text: &str) -> Option<Document<'_>> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    match Document::parse_with_options(text, opts) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::debug!(error = %e, "svg is not well-formed xml, using fallback size");
            None
        }
    }
}

// The root element must be <svg> (any namespace prefix).
fn svg_root<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    let root = doc.root_element();
    (root.tag_name().name() == "svg").then_some(root)
}

#[cfg(test)]
#[path = "../../tests/unit/convert/probe.rs"]
mod tests;
