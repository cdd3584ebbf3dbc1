//! Internal notes rendered as footnotes.
//!
//! Every piece of annotation output carries a `textColor` mark with
//! [`ANNOTATION_COLOR`]. External redaction tooling strips internal notes by
//! matching that one value, so it is part of the published contract.

use crate::paragraphs::{Addressing, ParagraphCursor};
use blockcast_tree::{walk, Body, Mark, Node, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Bumped whenever the color or section shape below changes
pub const ANNOTATION_CONTRACT_VERSION: u32 = 1;

/// Reserved color of every inline footnote marker and footnote entry
pub const ANNOTATION_COLOR: &str = "#6554c0";

pub const ANNOTATION_SECTION_TITLE: &str = "Internal notes (not visible to clients)";

/// Attribute that tags the footnote section; its value is
/// [`ANNOTATION_CONTRACT_VERSION`]
pub const ANNOTATION_SECTION_ATTR: &str = "blockcastAnnotations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNote {
    pub position: usize,
    pub content: String,
}

pub fn insert_annotations(tree: &Node, notes: &[InternalNote]) -> Node {
    insert_annotations_with(tree, notes, Addressing::Counter)
}

/// Append numbered footnote markers to annotated paragraphs and a collapsible
/// footnote section at the end of the document.
///
/// Footnotes are numbered 1..N by ascending position. Notes whose position
/// matches no paragraph are dropped before numbering.
#[instrument(skip_all, fields(notes = notes.len(), addressing = ?addressing))]
pub fn insert_annotations_with(tree: &Node, notes: &[InternalNote], addressing: Addressing) -> Node {
    if notes.is_empty() {
        return tree.clone();
    }

    let addresses = paragraph_addresses(tree, addressing);
    let mut footnotes: Vec<&InternalNote> = notes
        .iter()
        .filter(|note| addresses.contains(&note.position))
        .collect();
    footnotes.sort_by_key(|note| note.position);
    if footnotes.len() < notes.len() {
        debug!(
            dropped = notes.len() - footnotes.len(),
            "Internal notes without a matching paragraph were skipped"
        );
    }
    if footnotes.is_empty() {
        return tree.clone();
    }

    let mut cursor = ParagraphCursor::new(addressing);
    let mut out = annotate(tree, &footnotes, &mut cursor);
    match &mut out.body {
        Body::Container(children) => children.push(footnote_section(&footnotes)),
        Body::Text { .. } | Body::Empty => {
            warn!(kind = %out.kind, "Root is not a container, footnote section omitted");
        }
    }
    out
}

fn paragraph_addresses(tree: &Node, addressing: Addressing) -> HashSet<usize> {
    let mut cursor = ParagraphCursor::new(addressing);
    let mut addresses = HashSet::new();
    walk(tree, &mut |node| {
        if let Some(address) = cursor.visit(node) {
            addresses.insert(address);
        }
    });
    addresses
}

fn annotate(node: &Node, footnotes: &[&InternalNote], cursor: &mut ParagraphCursor) -> Node {
    let address = cursor.visit(node);
    let mut out = match &node.body {
        Body::Container(children) => node.with_body(Body::Container(
            children
                .iter()
                .map(|child| annotate(child, footnotes, cursor))
                .collect(),
        )),
        Body::Text { .. } | Body::Empty => node.clone(),
    };

    if let (Some(address), Body::Container(children)) = (address, &mut out.body) {
        for (number, note) in numbered(footnotes) {
            if note.position == address {
                children.push(Node::marked_text(superscript(number), annotation_marks()));
            }
        }
    }
    out
}

fn footnote_section(footnotes: &[&InternalNote]) -> Node {
    let entries = numbered(footnotes)
        .map(|(number, note)| {
            Node::paragraph(vec![
                Node::marked_text(superscript(number), annotation_marks()),
                Node::marked_text(format!(" {}", note.content), vec![Mark::em()]),
            ])
        })
        .collect();
    Node::container(NodeKind::Expand, entries)
        .with_attr("title", Value::String(ANNOTATION_SECTION_TITLE.to_string()))
        .with_attr(ANNOTATION_SECTION_ATTR, Value::from(ANNOTATION_CONTRACT_VERSION))
}

fn numbered<'a>(
    footnotes: &'a [&'a InternalNote],
) -> impl Iterator<Item = (usize, &'a InternalNote)> + 'a {
    footnotes
        .iter()
        .enumerate()
        .map(|(slot, note)| (slot + 1, *note))
}

fn annotation_marks() -> Vec<Mark> {
    vec![Mark::text_color(ANNOTATION_COLOR), Mark::strong()]
}

/// Unicode superscript digits for `number`
pub fn superscript(number: usize) -> String {
    number
        .to_string()
        .chars()
        .map(|digit| match digit {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

fn is_annotation_leaf(node: &Node) -> bool {
    node.marks().iter().any(|mark| {
        mark.color()
            .is_some_and(|color| color.eq_ignore_ascii_case(ANNOTATION_COLOR))
    })
}

fn is_footnote_section(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Expand | NodeKind::NestedExpand)
        && node.attrs.contains_key(ANNOTATION_SECTION_ATTR)
}

/// Remove every internal annotation: marked leaves, and the tagged footnote
/// section. Authored expands are kept and only lose the markers inside them.
pub fn strip_annotations(tree: &Node) -> Node {
    match &tree.body {
        Body::Container(children) => tree.with_body(Body::Container(
            children
                .iter()
                .filter(|child| !is_annotation_leaf(child) && !is_footnote_section(child))
                .map(strip_annotations)
                .collect(),
        )),
        Body::Text { .. } | Body::Empty => tree.clone(),
    }
}
