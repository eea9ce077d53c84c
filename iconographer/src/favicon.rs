//! `favicon`
//!
//! Sets the rendered size of an SVG favicon by rewriting the `width` and `height`
//! attributes of the document's root element. Only those two attribute values change,
//! every other byte of the document is kept as it was.

use std::ops::Range;

use roxmltree::{Document, Node, ParsingOptions};

/// A replacement of a span of the original document.
struct Splice {
    /// The bytes being replaced, empty for an insertion.
    range: Range<usize>,
    /// The text to put in their place.
    text: String,
}

/// Length of an element's name as written in the source, including any prefix.
fn qualified_name_len(document: &str, element: Node<'_, '_>) -> usize {
    let tag_name = element.tag_name();
    let local = tag_name.name();
    let tag = &document[element.range().start + 1..];

    element
        .namespaces()
        .filter(|namespace| Some(namespace.uri()) == tag_name.namespace())
        .filter_map(|namespace| namespace.name())
        .find(|prefix| {
            tag.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|rest| rest.starts_with(local))
        })
        .map_or(local.len(), |prefix| prefix.len() + 1 + local.len())
}

/// Sets the `width` and `height` of an SVG document's root element.
///
/// An attribute that is already present has its value replaced in place, keeping its quotes.
/// A missing attribute is inserted straight after the element name, `width` first. Width and
/// height are handled independently of each other. Only unprefixed attributes count, so
/// `foo:width` is left alone.
///
/// # Arguments
/// * `document`: The SVG source text.
/// * `width`: The width to set.
/// * `height`: The height to set.
///
/// # Returns
/// The patched document.
///
/// # Errors
/// An error if the document is not well formed XML.
pub fn set_root_size(document: &str, width: u32, height: u32) -> Result<String, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let parsed = Document::parse_with_options(document, options)?;
    let root = parsed.root_element();
    let name_end = root.range().start + 1 + qualified_name_len(document, root);

    let mut splices = [("width", width), ("height", height)]
        .into_iter()
        .map(|(name, value)| {
            let existing = root
                .attributes()
                .find(|attribute| attribute.namespace().is_none() && attribute.name() == name);
            match existing {
                Some(attribute) => Splice {
                    range: attribute.range_value(),
                    text: value.to_string(),
                },
                None => Splice {
                    range: name_end..name_end,
                    text: format!(" {name}=\"{value}\""),
                },
            }
        })
        .collect::<Vec<_>>();
    // Stable, so two insertions at the same offset stay in width, height order.
    splices.sort_by_key(|splice| splice.range.start);

    let mut patched = String::with_capacity(document.len() + 32);
    let mut cursor = 0;
    for splice in splices {
        patched.push_str(&document[cursor..splice.range.start]);
        patched.push_str(&splice.text);
        cursor = splice.range.end;
    }
    patched.push_str(&document[cursor..]);

    Ok(patched)
}
