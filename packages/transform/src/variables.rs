use crate::markers::variable_matches;
use blockcast_tree::{Body, Mark, Node};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Replace `{{name}}` markers with their values.
///
/// A marker without a non-empty value stays as literal text with a `code` mark
/// added, so editors can see what is still unset.
#[instrument(skip_all, fields(values = values.len()))]
pub fn substitute_variables(tree: &Node, values: &HashMap<String, String>) -> Node {
    match &tree.body {
        Body::Container(children) => {
            tree.with_body(Body::Container(substitute_children(children, values)))
        }
        Body::Text { .. } => {
            let mut expanded = substitute_leaf(tree, values);
            if expanded.len() == 1 {
                expanded.remove(0)
            } else {
                debug!(leaves = expanded.len(), "Root text node expanded, wrapping in a paragraph");
                Node::paragraph(expanded)
            }
        }
        Body::Empty => tree.clone(),
    }
}

fn substitute_children(children: &[Node], values: &HashMap<String, String>) -> Vec<Node> {
    children
        .iter()
        .flat_map(|child| match &child.body {
            Body::Container(grandchildren) => vec![child.with_body(Body::Container(
                substitute_children(grandchildren, values),
            ))],
            Body::Text { .. } => substitute_leaf(child, values),
            Body::Empty => vec![child.clone()],
        })
        .collect()
}

/// Expand one text leaf into the leaves that replace it.
///
/// Substituted values are merged into the surrounding literal text and keep the
/// leaf's marks. Each placeholder becomes its own leaf.
pub fn substitute_leaf(leaf: &Node, values: &HashMap<String, String>) -> Vec<Node> {
    let Some(text) = leaf.text_content() else {
        return vec![leaf.clone()];
    };
    let matches = variable_matches(text);
    if matches.is_empty() {
        return vec![leaf.clone()];
    }

    let mut out = Vec::new();
    let mut literal = String::new();
    let mut cursor = 0;
    for found in matches {
        literal.push_str(&text[cursor..found.start]);
        match values.get(&found.name).filter(|value| !value.is_empty()) {
            Some(value) => literal.push_str(value),
            None => {
                if !literal.is_empty() {
                    out.push(leaf.with_text(std::mem::take(&mut literal)));
                }
                out.push(placeholder(leaf, &text[found.start..found.end]));
            }
        }
        cursor = found.end;
    }
    literal.push_str(&text[cursor..]);
    if !literal.is_empty() {
        out.push(leaf.with_text(literal));
    }
    out
}

fn placeholder(leaf: &Node, marker: &str) -> Node {
    let mut marks = leaf.marks().to_vec();
    if !marks.iter().any(|mark| mark.kind == "code") {
        marks.push(Mark::code());
    }
    leaf.with_body(Body::Text {
        text: marker.to_string(),
        marks,
    })
}
