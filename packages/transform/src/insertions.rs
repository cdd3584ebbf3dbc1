use crate::paragraphs::{Addressing, ParagraphCursor};
use blockcast_tree::{Body, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A custom paragraph placed after the paragraph at `position`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomInsertion {
    pub position: usize,
    pub text: String,
}

/// Insert custom paragraphs right after their target paragraphs.
///
/// Several insertions at one position keep their input order. Insertions whose
/// position matches no paragraph are dropped.
pub fn insert_custom_paragraphs(tree: &Node, insertions: &[CustomInsertion]) -> Node {
    insert_custom_paragraphs_with(tree, insertions, Addressing::Counter)
}

#[instrument(skip_all, fields(insertions = insertions.len(), addressing = ?addressing))]
pub fn insert_custom_paragraphs_with(
    tree: &Node,
    insertions: &[CustomInsertion],
    addressing: Addressing,
) -> Node {
    let pending: Vec<&CustomInsertion> = insertions
        .iter()
        .filter(|insertion| !insertion.text.trim().is_empty())
        .collect();
    if pending.is_empty() {
        return tree.clone();
    }

    let mut cursor = ParagraphCursor::new(addressing);
    let mut placed = HashSet::new();
    // The root itself is never a sibling list entry
    cursor.visit(tree);
    let out = match &tree.body {
        Body::Container(children) => tree.with_body(Body::Container(insert_into(
            children,
            &pending,
            &mut cursor,
            &mut placed,
        ))),
        Body::Text { .. } | Body::Empty => tree.clone(),
    };

    let dropped = pending.len() - placed.len();
    if dropped > 0 {
        debug!(dropped, "Custom insertions without a matching paragraph were skipped");
    }
    out
}

fn insert_into(
    children: &[Node],
    pending: &[&CustomInsertion],
    cursor: &mut ParagraphCursor,
    placed: &mut HashSet<usize>,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        let address = cursor.visit(child);
        out.push(match &child.body {
            Body::Container(grandchildren) => child.with_body(Body::Container(insert_into(
                grandchildren,
                pending,
                cursor,
                placed,
            ))),
            Body::Text { .. } | Body::Empty => child.clone(),
        });

        let Some(address) = address else {
            continue;
        };
        for (slot, insertion) in pending.iter().enumerate() {
            if insertion.position == address {
                out.push(Node::paragraph(vec![Node::text(insertion.text.clone())]));
                placed.insert(slot);
            }
        }
    }
    out
}
