//! Toggle filtering.
//!
//! Each container is filtered against the concatenated text of its direct
//! children. A child whose text range crosses the boundary of a disabled
//! toggle block, or lies inside one, is dropped whole. A disabled block that
//! sits entirely inside one child is handled by that child: text leaves cut it
//! out, containers recurse. Toggles with no state entry are disabled.
//!
//! Ghost mode keeps disabled content and tags it with [`GHOST_ATTR`] instead of
//! dropping it, for side-by-side previews and diffs.

use crate::markers::{strip_toggle_markers, toggle_spans};
use blockcast_tree::{flatten_text, Body, Node};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Attribute set on content that ghost mode retained from a disabled toggle.
/// The value is the toggle name.
pub const GHOST_ATTR: &str = "toggleGhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    /// Drop disabled content
    Remove,
    /// Keep disabled content, tagged with [`GHOST_ATTR`]
    Ghost,
}

/// A toggle block resolved against the toggle states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRange {
    pub name: String,
    pub enabled: bool,
    pub start: usize,
    pub end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
}

/// Absent toggles resolve to disabled.
pub fn toggle_enabled(states: &HashMap<String, bool>, name: &str) -> bool {
    states.get(name).copied().unwrap_or(false)
}

pub fn find_toggle_ranges(text: &str, states: &HashMap<String, bool>) -> Vec<ToggleRange> {
    toggle_spans(text)
        .into_iter()
        .map(|span| ToggleRange {
            enabled: toggle_enabled(states, &span.name),
            name: span.name,
            start: span.start,
            end: span.end,
            inner_start: span.inner_start,
            inner_end: span.inner_end,
        })
        .collect()
}

/// Remove disabled toggle content and strip all toggle markers
#[instrument(skip_all, fields(toggles = states.len()))]
pub fn filter_by_toggles(tree: &Node, states: &HashMap<String, bool>) -> Node {
    filter_root(tree, states, ToggleMode::Remove)
}

/// Like [`filter_by_toggles`], but disabled content is kept and tagged
#[instrument(skip_all, fields(toggles = states.len()))]
pub fn ghost_filter(tree: &Node, states: &HashMap<String, bool>) -> Node {
    filter_root(tree, states, ToggleMode::Ghost)
}

fn filter_root(tree: &Node, states: &HashMap<String, bool>, mode: ToggleMode) -> Node {
    match &tree.body {
        // The root is kept even when nothing survives
        Body::Container(children) => tree.with_body(Body::Container(filter_children(
            children, states, mode,
        ))),
        Body::Text { text, .. } => filter_leaf(tree, text, states, mode)
            .into_iter()
            .next()
            .unwrap_or_else(|| tree.with_text("")),
        Body::Empty => tree.clone(),
    }
}

fn filter_children(
    children: &[Node],
    states: &HashMap<String, bool>,
    mode: ToggleMode,
) -> Vec<Node> {
    let mut text = String::new();
    let mut ranges = Vec::with_capacity(children.len());
    for child in children {
        let start = text.len();
        match &child.body {
            Body::Text { text: leaf, .. } => text.push_str(leaf),
            Body::Container(_) => text.push_str(&flatten_text(child)),
            Body::Empty => {}
        }
        ranges.push((start, text.len()));
    }

    let disabled: Vec<ToggleRange> = find_toggle_ranges(&text, states)
        .into_iter()
        .filter(|range| !range.enabled)
        .collect();

    let mut out = Vec::with_capacity(children.len());
    for (child, (start, end)) in children.iter().zip(ranges) {
        let crossing = disabled.iter().find(|range| {
            let overlaps = end > range.start && start < range.end;
            let contains = start <= range.start && range.end <= end;
            overlaps && !contains
        });

        match (crossing, mode) {
            (Some(range), ToggleMode::Remove) => {
                debug!(toggle = %range.name, kind = %child.kind, "Dropping node inside disabled toggle");
            }
            (Some(range), ToggleMode::Ghost) => out.extend(ghost_node(child, &range.name)),
            (None, _) => out.extend(filter_node(child, states, mode)),
        }
    }
    out
}

fn filter_node(node: &Node, states: &HashMap<String, bool>, mode: ToggleMode) -> Vec<Node> {
    match &node.body {
        Body::Text { text, .. } => filter_leaf(node, text, states, mode),
        Body::Container(children) => {
            let filtered = filter_children(children, states, mode);
            if filtered.is_empty() && !children.is_empty() {
                return Vec::new();
            }
            vec![node.with_body(Body::Container(filtered))]
        }
        Body::Empty => vec![node.clone()],
    }
}

/// Split a leaf at the disabled blocks it contains.
fn filter_leaf(
    node: &Node,
    text: &str,
    states: &HashMap<String, bool>,
    mode: ToggleMode,
) -> Vec<Node> {
    let mut disabled: Vec<ToggleRange> = find_toggle_ranges(text, states)
        .into_iter()
        .filter(|range| !range.enabled)
        .collect();
    disabled.sort_by_key(|range| range.start);

    // Merge nested/overlapping blocks, keeping the outermost name
    let mut hidden: Vec<(usize, usize, &str)> = Vec::new();
    for range in &disabled {
        match hidden.last_mut() {
            Some(last) if range.start < last.1 => last.1 = last.1.max(range.end),
            _ => hidden.push((range.start, range.end, range.name.as_str())),
        }
    }

    if hidden.is_empty() {
        let cleaned = strip_toggle_markers(text);
        if cleaned.is_empty() {
            return Vec::new();
        }
        return vec![node.with_text(cleaned.into_owned())];
    }

    match mode {
        ToggleMode::Remove => {
            let mut kept = String::with_capacity(text.len());
            let mut cursor = 0;
            for (start, end, _) in &hidden {
                kept.push_str(&text[cursor..*start]);
                cursor = *end;
            }
            kept.push_str(&text[cursor..]);
            let cleaned = strip_toggle_markers(&kept);
            if cleaned.is_empty() {
                Vec::new()
            } else {
                vec![node.with_text(cleaned.into_owned())]
            }
        }
        ToggleMode::Ghost => {
            let mut segments = Vec::new();
            let mut cursor = 0;
            for (start, end, name) in &hidden {
                push_segment(&mut segments, node, &text[cursor..*start], None);
                push_segment(&mut segments, node, &text[*start..*end], Some(*name));
                cursor = *end;
            }
            push_segment(&mut segments, node, &text[cursor..], None);
            segments
        }
    }
}

fn push_segment(out: &mut Vec<Node>, node: &Node, segment: &str, ghost: Option<&str>) {
    let cleaned = strip_toggle_markers(segment);
    if cleaned.is_empty() {
        return;
    }
    let leaf = node.with_text(cleaned.into_owned());
    out.push(match ghost {
        Some(name) => leaf.with_attr(GHOST_ATTR, Value::String(name.to_string())),
        None => leaf,
    });
}

/// Tag a node as ghost content, stripping markers from everything under it.
fn ghost_node(node: &Node, toggle: &str) -> Option<Node> {
    strip_markers_deep(node).map(|kept| kept.with_attr(GHOST_ATTR, Value::String(toggle.to_string())))
}

fn strip_markers_deep(node: &Node) -> Option<Node> {
    match &node.body {
        Body::Text { text, .. } => {
            let cleaned = strip_toggle_markers(text);
            (!cleaned.is_empty()).then(|| node.with_text(cleaned.into_owned()))
        }
        Body::Container(children) => {
            let kept: Vec<Node> = children.iter().filter_map(strip_markers_deep).collect();
            if kept.is_empty() && !children.is_empty() {
                return None;
            }
            Some(node.with_body(Body::Container(kept)))
        }
        Body::Empty => Some(node.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcast_tree::{Mark, NodeKind};

    fn states(entries: &[(&str, bool)]) -> HashMap<String, bool> {
        entries
            .iter()
            .map(|(name, enabled)| (name.to_string(), *enabled))
            .collect()
    }

    fn secret_doc() -> Node {
        Node::doc(vec![
            Node::paragraph(vec![Node::text("Intro")]),
            Node::paragraph(vec![Node::text("{{toggle:X}}secret{{/toggle:X}}")]),
        ])
    }

    #[test]
    fn test_absent_toggle_is_disabled() {
        let filtered = filter_by_toggles(&secret_doc(), &HashMap::new());
        let text = flatten_text(&filtered);
        assert_eq!(text, "Intro");
        assert!(!text.contains("{{"));
        // The emptied paragraph is gone
        assert_eq!(filtered.children().unwrap().len(), 1);
    }

    #[test]
    fn test_enabled_toggle_keeps_content_without_markers() {
        let filtered = filter_by_toggles(&secret_doc(), &states(&[("X", true)]));
        let text = flatten_text(&filtered);
        assert_eq!(text, "Introsecret");
        assert!(!text.contains("{{toggle:X}}"));
        assert!(!text.contains("{{/toggle:X}}"));
    }

    #[test]
    fn test_disabled_block_inside_leaf_is_cut_out() {
        let tree = Node::doc(vec![Node::paragraph(vec![Node::text(
            "Deal {{toggle:bonus}}with bonus{{/toggle:bonus}}.",
        )])]);
        let filtered = filter_by_toggles(&tree, &states(&[("bonus", false)]));
        assert_eq!(flatten_text(&filtered), "Deal .");
    }

    #[test]
    fn test_block_spanning_paragraphs_drops_them_whole() {
        let tree = Node::doc(vec![
            Node::paragraph(vec![Node::text("Keep")]),
            Node::paragraph(vec![Node::text("Start {{toggle:t}}one")]),
            Node::paragraph(vec![Node::text("two")]),
            Node::paragraph(vec![Node::text("three{{/toggle:t}} end")]),
            Node::paragraph(vec![Node::text("Tail")]),
        ]);

        let filtered = filter_by_toggles(&tree, &HashMap::new());
        let paragraphs: Vec<String> = filtered.children().unwrap().iter().map(flatten_text).collect();
        assert_eq!(paragraphs, vec!["Keep", "Tail"]);

        let shown = filter_by_toggles(&tree, &states(&[("t", true)]));
        assert_eq!(flatten_text(&shown), "KeepStart onetwothree endTail");
    }

    #[test]
    fn test_leaf_straddling_boundary_is_dropped_whole() {
        let tree = Node::doc(vec![Node::paragraph(vec![
            Node::text("before {{toggle:t}}in"),
            Node::marked_text("side{{/toggle:t}} after", vec![Mark::strong()]),
            Node::text(" kept"),
        ])]);
        let filtered = filter_by_toggles(&tree, &HashMap::new());
        assert_eq!(flatten_text(&filtered), " kept");
    }

    #[test]
    fn test_recurses_into_nested_containers() {
        let tree = Node::doc(vec![Node::panel(vec![
            Node::paragraph(vec![Node::text("Visible")]),
            Node::paragraph(vec![Node::text("{{toggle:x}}Hidden{{/toggle:x}}")]),
        ])]);
        let filtered = filter_by_toggles(&tree, &HashMap::new());
        let panel = &filtered.children().unwrap()[0];
        assert_eq!(panel.kind, NodeKind::Panel);
        assert_eq!(panel.children().unwrap().len(), 1);
        assert_eq!(flatten_text(panel), "Visible");
    }

    #[test]
    fn test_nested_disabled_inside_enabled() {
        let tree = Node::doc(vec![Node::paragraph(vec![Node::text(
            "{{toggle:outer}}a{{toggle:inner}}b{{/toggle:inner}}c{{/toggle:outer}}",
        )])]);
        let filtered = filter_by_toggles(&tree, &states(&[("outer", true)]));
        assert_eq!(flatten_text(&filtered), "ac");
    }

    #[test]
    fn test_root_is_kept_when_empty() {
        let tree = Node::doc(vec![Node::paragraph(vec![Node::text(
            "{{toggle:x}}all{{/toggle:x}}",
        )])]);
        let filtered = filter_by_toggles(&tree, &HashMap::new());
        assert_eq!(filtered, Node::doc(vec![]));
    }

    #[test]
    fn test_unbalanced_open_marker_is_left_as_text() {
        let tree = Node::doc(vec![Node::paragraph(vec![Node::text("{{toggle:x}}oops")])]);
        let filtered = filter_by_toggles(&tree, &HashMap::new());
        assert_eq!(flatten_text(&filtered), "oops");
    }

    #[test]
    fn test_hard_break_inside_disabled_block_is_dropped() {
        let tree = Node::doc(vec![Node::paragraph(vec![
            Node::text("a{{toggle:x}}b"),
            Node::hard_break(),
            Node::text("c{{/toggle:x}}"),
            Node::hard_break(),
            Node::text("d"),
        ])]);
        let filtered = filter_by_toggles(&tree, &HashMap::new());
        let paragraph = &filtered.children().unwrap()[0];
        assert_eq!(paragraph.children().unwrap(), &[Node::hard_break(), Node::text("d")]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let tree = secret_doc();
        let before = tree.clone();
        let _ = filter_by_toggles(&tree, &HashMap::new());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_ghost_mode_tags_instead_of_dropping() {
        let tree = Node::doc(vec![
            Node::paragraph(vec![Node::text("Deal {{toggle:bonus}}with bonus{{/toggle:bonus}}.")]),
            Node::paragraph(vec![Node::text("{{toggle:x}}Start")]),
            Node::paragraph(vec![Node::text("End{{/toggle:x}}")]),
        ]);
        let ghost = ghost_filter(&tree, &HashMap::new());
        let paragraphs = ghost.children().unwrap();
        assert_eq!(paragraphs.len(), 3);

        let leaves = paragraphs[0].children().unwrap();
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[1].text_content(), Some("with bonus"));
        assert_eq!(leaves[1].attr_str(GHOST_ATTR), Some("bonus"));
        assert_eq!(leaves[0].attr_str(GHOST_ATTR), None);

        assert_eq!(paragraphs[1].attr_str(GHOST_ATTR), Some("x"));
        assert_eq!(flatten_text(&paragraphs[1]), "Start");
        assert_eq!(flatten_text(&ghost), "Deal with bonus.StartEnd");
    }

    #[test]
    fn test_ghost_mode_leaves_enabled_content_untagged() {
        let ghost = ghost_filter(&secret_doc(), &states(&[("X", true)]));
        let secret = &ghost.children().unwrap()[1];
        assert_eq!(secret.attr_str(GHOST_ATTR), None);
        assert_eq!(secret.children().unwrap()[0].attr_str(GHOST_ATTR), None);
    }

    #[test]
    fn test_find_toggle_ranges_resolves_state() {
        let ranges = find_toggle_ranges(
            "{{toggle:a}}1{{/toggle:a}}{{toggle:b}}2{{/toggle:b}}",
            &states(&[("a", true)]),
        );
        assert_eq!(ranges.len(), 2);
        assert!(ranges[0].enabled);
        assert!(!ranges[1].enabled);
    }
}
