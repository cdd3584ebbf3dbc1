//! Line diff between the synced and current versions of a Source.
//!
//! Both versions are rendered in ghost mode with the embed's own variable
//! values and toggle states, so content hidden behind a disabled toggle still
//! shows up in the diff, bracketed by `[toggle:NAME]` / `[/toggle:NAME]`.

use blockcast_transform::{render_ghost, GHOST_ATTR};
use blockcast_tree::{Body, Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut summary, line| {
            match line.kind {
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Unchanged => summary.unchanged += 1,
            }
            summary
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostDiff {
    pub line_diff: Vec<DiffLine>,
    pub old_ghost_tree: Node,
    pub new_ghost_tree: Node,
    pub summary: DiffSummary,
}

impl GhostDiff {
    pub fn has_changes(&self) -> bool {
        self.summary.added > 0 || self.summary.removed > 0
    }
}

/// Ghost-render both trees with the same settings and diff their text
#[instrument(skip_all, fields(values = variable_values.len(), toggles = toggle_states.len()))]
pub fn build_ghost_diff(
    old: &Node,
    new: &Node,
    variable_values: &HashMap<String, String>,
    toggle_states: &HashMap<String, bool>,
) -> GhostDiff {
    let old_ghost_tree = render_ghost(old, variable_values, toggle_states);
    let new_ghost_tree = render_ghost(new, variable_values, toggle_states);
    let line_diff = line_diff(&ghost_text(&old_ghost_tree), &ghost_text(&new_ghost_tree));
    let summary = DiffSummary::from_lines(&line_diff);
    debug!(
        added = summary.added,
        removed = summary.removed,
        unchanged = summary.unchanged,
        "Built ghost diff"
    );

    GhostDiff {
        line_diff,
        old_ghost_tree,
        new_ghost_tree,
        summary,
    }
}

/// Plain text of a ghost-rendered tree, one line per text block.
///
/// Hard breaks start a new line. Blank lines are left out.
pub fn ghost_text(tree: &Node) -> String {
    let mut lines = Vec::new();
    push_block(tree, &mut lines);
    lines.retain(|line| !line.trim().is_empty());
    lines.join("\n")
}

fn push_block(node: &Node, lines: &mut Vec<String>) {
    match &node.body {
        Body::Text { .. } => {
            let mut line = String::new();
            push_inline(node, &mut line, lines);
            lines.push(line);
        }
        Body::Container(children) => {
            let ghost = node.attr_str(GHOST_ATTR);
            if let Some(name) = ghost {
                lines.push(open_marker(name));
            }
            if node.kind.is_text_block() {
                let mut line = String::new();
                for child in children {
                    push_inline(child, &mut line, lines);
                }
                lines.push(line);
            } else {
                for child in children {
                    push_block(child, lines);
                }
            }
            if let Some(name) = ghost {
                lines.push(close_marker(name));
            }
        }
        Body::Empty => {}
    }
}

fn push_inline(node: &Node, line: &mut String, lines: &mut Vec<String>) {
    if node.kind == NodeKind::HardBreak {
        lines.push(std::mem::take(line));
        return;
    }

    let ghost = node.attr_str(GHOST_ATTR);
    if let Some(name) = ghost {
        line.push_str(&open_marker(name));
    }
    match &node.body {
        Body::Text { text, .. } => line.push_str(text),
        Body::Container(children) => {
            for child in children {
                push_inline(child, line, lines);
            }
        }
        Body::Empty => {}
    }
    if let Some(name) = ghost {
        line.push_str(&close_marker(name));
    }
}

fn open_marker(name: &str) -> String {
    format!("[toggle:{}]", name)
}

fn close_marker(name: &str) -> String {
    format!("[/toggle:{}]", name)
}

/// Longest-common-subsequence diff over lines
pub fn line_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let n = old_lines.len();
    let m = new_lines.len();

    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old_lines[i] == new_lines[j] {
            out.push(DiffLine::new(DiffKind::Unchanged, old_lines[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(DiffLine::new(DiffKind::Removed, old_lines[i]));
            i += 1;
        } else {
            out.push(DiffLine::new(DiffKind::Added, new_lines[j]));
            j += 1;
        }
    }
    out.extend(old_lines[i..].iter().map(|line| DiffLine::new(DiffKind::Removed, line)));
    out.extend(new_lines[j..].iter().map(|line| DiffLine::new(DiffKind::Added, line)));
    out
}
