//! # Blockcast render tree
//!
//! The recursive rich-text document every other blockcast package operates on.
//!
//! Trees are treated as immutable: transformations take `&Node` and build new
//! nodes, so a caller can derive several renders from the same source tree.

pub mod error;
pub mod node;
pub mod normalize;
pub mod text;

pub use error::{TreeError, TreeResult};
pub use node::{Body, Mark, Node, NodeKind};
pub use normalize::{canonical_string, normalize_tree};
pub use text::{flatten_text, walk};

/// Parse a render tree from its JSON wire form
pub fn parse_tree(source: &str) -> TreeResult<Node> {
    Ok(serde_json::from_str(source)?)
}

/// Convert an already-decoded JSON value into a render tree
pub fn tree_from_value(value: serde_json::Value) -> TreeResult<Node> {
    Ok(serde_json::from_value(value)?)
}
