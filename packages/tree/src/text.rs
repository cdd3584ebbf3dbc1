use crate::node::{Body, Node};

/// Concatenate every text leaf under `node`, depth-first, in document order.
pub fn flatten_text(node: &Node) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Node, out: &mut String) {
    match &node.body {
        Body::Text { text, .. } => out.push_str(text),
        Body::Container(children) => {
            for child in children {
                push_text(child, out);
            }
        }
        Body::Empty => {}
    }
}

/// Visit every node pre-order, depth-first.
pub fn walk<'a>(node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
    visit(node);
    if let Some(children) = node.children() {
        for child in children {
            walk(child, visit);
        }
    }
}
