//! The render pipeline: toggle filter, variable substitution, custom
//! paragraphs, then annotations.
//!
//! Paragraph addresses are fixed on the unfiltered source tree before toggle
//! filtering runs, so a stored insertion position always refers to the same
//! authored paragraph whatever the toggle state. Content anchored on a
//! paragraph that a disabled toggle removed is dropped.

use crate::annotations::insert_annotations_with;
use crate::embed::{Audience, EmbedConfig};
use crate::insertions::insert_custom_paragraphs_with;
use crate::paragraphs::{clear_anchors, stamp_anchors, Addressing};
use crate::toggles::{filter_by_toggles, ghost_filter};
use crate::variables::substitute_variables;
use blockcast_tree::Node;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Render an embed of `source` for `audience`
#[instrument(skip_all, fields(
    audience = ?audience,
    insertions = config.custom_insertions.len(),
    notes = config.internal_notes.len()
))]
pub fn render_embed(source: &Node, config: &EmbedConfig, audience: Audience) -> Node {
    let anchored = stamp_anchors(source);
    let filtered = filter_by_toggles(&anchored, &config.toggle_states);
    let substituted = substitute_variables(&filtered, &config.variable_values);
    let inserted = insert_custom_paragraphs_with(
        &substituted,
        &config.custom_insertions,
        Addressing::Anchors,
    );
    let annotated = match audience {
        Audience::Internal => {
            insert_annotations_with(&inserted, &config.internal_notes, Addressing::Anchors)
        }
        Audience::External => inserted,
    };
    info!("Rendered embed");
    clear_anchors(&annotated)
}

/// Render with disabled toggle content kept and tagged, for previews and diffs
pub fn render_ghost(
    source: &Node,
    variable_values: &HashMap<String, String>,
    toggle_states: &HashMap<String, bool>,
) -> Node {
    let ghost = ghost_filter(source, toggle_states);
    substitute_variables(&ghost, variable_values)
}
