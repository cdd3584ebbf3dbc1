//! Paragraph addressing.
//!
//! A paragraph's address is its ordinal among non-empty paragraphs in
//! depth-first document order, counted with one running counter across the
//! whole tree (paragraphs inside panels, lists and tables continue the count).

use blockcast_tree::{flatten_text, Body, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

/// Attribute holding the address a paragraph had in the unfiltered tree
pub const ANCHOR_ATTR: &str = "blockcastAnchor";

const EXCERPT_LIMIT: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphInfo {
    pub index: usize,
    pub last_sentence: String,
    pub full_text: String,
}

/// How insertion passes resolve a paragraph's address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Count paragraphs in the tree as given
    Counter,
    /// Use the address stamped by [`stamp_anchors`]; unstamped paragraphs
    /// have no address
    Anchors,
}

/// Traversal state shared by every pass that addresses paragraphs
#[derive(Debug)]
pub struct ParagraphCursor {
    next: usize,
    addressing: Addressing,
}

impl ParagraphCursor {
    pub fn new(addressing: Addressing) -> Self {
        Self {
            next: 0,
            addressing,
        }
    }

    /// Address of `node` if it is a counted paragraph. Advances the counter.
    pub fn visit(&mut self, node: &Node) -> Option<usize> {
        if !is_counted_paragraph(node) {
            return None;
        }
        let counted = self.next;
        self.next += 1;
        match self.addressing {
            Addressing::Counter => Some(counted),
            Addressing::Anchors => anchor_of(node),
        }
    }
}

fn is_counted_paragraph(node: &Node) -> bool {
    node.is_paragraph() && !flatten_text(node).trim().is_empty()
}

fn anchor_of(node: &Node) -> Option<usize> {
    node.attrs
        .get(ANCHOR_ATTR)
        .and_then(Value::as_u64)
        .and_then(|anchor| usize::try_from(anchor).ok())
}

/// Address and excerpt of every non-empty paragraph, in document order
#[instrument(skip_all)]
pub fn index_paragraphs(tree: &Node) -> Vec<ParagraphInfo> {
    let mut cursor = ParagraphCursor::new(Addressing::Counter);
    let mut out = Vec::new();
    collect(tree, &mut cursor, &mut out);
    out
}

fn collect(node: &Node, cursor: &mut ParagraphCursor, out: &mut Vec<ParagraphInfo>) {
    if let Some(index) = cursor.visit(node) {
        let full_text = flatten_text(node);
        out.push(ParagraphInfo {
            index,
            last_sentence: last_sentence(&full_text),
            full_text,
        });
    }
    if let Some(children) = node.children() {
        for child in children {
            collect(child, cursor, out);
        }
    }
}

/// Last sentence of `text`, trimmed and cut to 60 characters.
pub fn last_sentence(text: &str) -> String {
    let trimmed = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = trimmed.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_index, next)) = chars.peek() {
            if next.is_whitespace() {
                sentences.push(&trimmed[start..next_index]);
                start = next_index;
            }
        }
    }
    sentences.push(&trimmed[start..]);

    let last = sentences
        .into_iter()
        .rev()
        .map(str::trim)
        .find(|sentence| !sentence.is_empty())
        .unwrap_or("");

    if last.chars().count() > EXCERPT_LIMIT {
        let mut excerpt: String = last.chars().take(EXCERPT_LIMIT).collect();
        excerpt.push_str("...");
        excerpt
    } else {
        last.to_string()
    }
}

/// Record each paragraph's current address on the paragraph itself, so later
/// passes can find it after toggle filtering has removed other paragraphs.
pub fn stamp_anchors(tree: &Node) -> Node {
    let mut cursor = ParagraphCursor::new(Addressing::Counter);
    stamp(tree, &mut cursor)
}

fn stamp(node: &Node, cursor: &mut ParagraphCursor) -> Node {
    let address = cursor.visit(node);
    let mut out = match &node.body {
        Body::Container(children) => node.with_body(Body::Container(
            children.iter().map(|child| stamp(child, cursor)).collect(),
        )),
        Body::Text { .. } | Body::Empty => node.clone(),
    };
    if let Some(address) = address {
        out.attrs.insert(ANCHOR_ATTR.to_string(), Value::from(address));
    }
    out
}

/// Remove every anchor stamped by [`stamp_anchors`]
pub fn clear_anchors(tree: &Node) -> Node {
    let mut out = match &tree.body {
        Body::Container(children) => {
            tree.with_body(Body::Container(children.iter().map(clear_anchors).collect()))
        }
        Body::Text { .. } | Body::Empty => tree.clone(),
    };
    out.attrs.remove(ANCHOR_ATTR);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcast_tree::NodeKind;

    fn p(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    fn nested_doc() -> Node {
        Node::doc(vec![
            p("First."),
            Node::panel(vec![p("In panel."), p("   ")]),
            Node::container(
                NodeKind::Table,
                vec![Node::container(
                    NodeKind::TableRow,
                    vec![Node::container(NodeKind::TableCell, vec![p("Cell.")])],
                )],
            ),
            p("Last."),
        ])
    }

    #[test]
    fn test_indices_are_contiguous_across_nesting() {
        let paragraphs = index_paragraphs(&nested_doc());
        let indices: Vec<usize> = paragraphs.iter().map(|info| info.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let texts: Vec<&str> = paragraphs.iter().map(|info| info.full_text.as_str()).collect();
        assert_eq!(texts, vec!["First.", "In panel.", "Cell.", "Last."]);
    }

    #[test]
    fn test_empty_paragraphs_take_no_index() {
        let doc = Node::doc(vec![p(""), Node::paragraph(vec![]), p("Text")]);
        let paragraphs = index_paragraphs(&doc);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].index, 0);
    }

    #[test]
    fn test_last_sentence() {
        assert_eq!(last_sentence("One. Two! Three?"), "Three?");
        assert_eq!(last_sentence("  Version 1.2 ships today.  "), "Version 1.2 ships today.");
        assert_eq!(last_sentence("Trailing dot. "), "Trailing dot.");
        assert_eq!(last_sentence(""), "");
    }

    #[test]
    fn test_last_sentence_is_truncated() {
        let long = "a".repeat(80);
        let excerpt = last_sentence(&long);
        assert_eq!(excerpt.chars().count(), 63);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_stamp_and_clear_anchors() {
        let doc = nested_doc();
        let stamped = stamp_anchors(&doc);
        let children = stamped.children().unwrap();
        assert_eq!(children[0].attrs.get(ANCHOR_ATTR), Some(&Value::from(0)));
        assert_eq!(children[3].attrs.get(ANCHOR_ATTR), Some(&Value::from(3)));
        // Whitespace-only paragraph is not stamped
        let panel = children[1].children().unwrap();
        assert_eq!(panel[1].attrs.get(ANCHOR_ATTR), None);

        assert_eq!(clear_anchors(&stamped), doc);
    }

    #[test]
    fn test_anchor_addressing_ignores_unstamped_paragraphs() {
        let mut cursor = ParagraphCursor::new(Addressing::Anchors);
        let stamped = p("a").with_attr(ANCHOR_ATTR, Value::from(7));
        assert_eq!(cursor.visit(&p("inserted")), None);
        assert_eq!(cursor.visit(&stamped), Some(7));
    }
}
