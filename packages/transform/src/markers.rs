//! Marker syntax: `{{name}}` variables and `{{toggle:name}}...{{/toggle:name}}` blocks.

use blockcast_fingerprint::{Toggle, Variable};
use blockcast_tree::{flatten_text, walk, Node};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static VARIABLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}").expect("variable marker pattern is valid")
});

static TOGGLE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{toggle:([^}]+)\}\}").expect("toggle open pattern is valid")
});

static TOGGLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{/?toggle:[^}]+\}\}").expect("toggle marker pattern is valid")
});

/// A `{{name}}` occurrence inside one string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMatch {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// A paired toggle block inside one string. Offsets are byte offsets; `start..end`
/// includes both markers, `inner_start..inner_end` is the content between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSpan {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleMarker {
    pub name: String,
}

fn is_toggle_marker(name: &str) -> bool {
    name.starts_with("toggle:") || name.starts_with("/toggle:")
}

/// Variable markers in `text`, skipping toggle markers
pub fn variable_matches(text: &str) -> Vec<VariableMatch> {
    VARIABLE_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().trim();
            if name.is_empty() || is_toggle_marker(name) {
                return None;
            }
            Some(VariableMatch {
                name: name.to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Paired toggle blocks in `text`.
///
/// Each open marker pairs with the first following close marker of the same
/// name. Scanning resumes right after each open marker, so differently named
/// blocks nested inside one another are all reported. Unpaired opens are not.
pub fn toggle_spans(text: &str) -> Vec<ToggleSpan> {
    let mut spans = Vec::new();
    for caps in TOGGLE_OPEN.captures_iter(text) {
        let (Some(open), Some(raw_name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = raw_name.as_str().trim();
        if name.is_empty() {
            continue;
        }
        let close = format!("{{{{/toggle:{}}}}}", raw_name.as_str());
        if let Some(offset) = text[open.end()..].find(&close) {
            let inner_end = open.end() + offset;
            spans.push(ToggleSpan {
                name: name.to_string(),
                start: open.start(),
                end: inner_end + close.len(),
                inner_start: open.end(),
                inner_end,
            });
        }
    }
    spans
}

/// Remove every `{{toggle:...}}` and `{{/toggle:...}}` marker from `text`
pub fn strip_toggle_markers(text: &str) -> Cow<'_, str> {
    TOGGLE_MARKER.replace_all(text, "")
}

/// Distinct variable names in document order
pub fn scan_variable_markers(tree: &Node) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    walk(tree, &mut |node| {
        if let Some(text) = node.text_content() {
            for found in variable_matches(text) {
                if seen.insert(found.name.clone()) {
                    names.push(found.name);
                }
            }
        }
    });
    names
}

/// Distinct toggle names in document order.
///
/// Runs over the flattened text so blocks that open in one paragraph and close
/// in another are found.
pub fn scan_toggle_markers(tree: &Node) -> Vec<ToggleMarker> {
    let text = flatten_text(tree);
    let mut seen = HashSet::new();
    toggle_spans(&text)
        .into_iter()
        .filter(|span| seen.insert(span.name.clone()))
        .map(|span| ToggleMarker { name: span.name })
        .collect()
}

/// Rebuild a variable list from detected marker names, keeping the metadata
/// of variables that are still referenced.
pub fn merge_variables(existing: &[Variable], detected: &[String]) -> Vec<Variable> {
    let by_name: HashMap<&str, &Variable> = existing.iter().map(|v| (v.name.as_str(), v)).collect();
    detected
        .iter()
        .map(|name| match by_name.get(name.as_str()) {
            Some(known) => (*known).clone(),
            None => Variable::new(name.clone()),
        })
        .collect()
}

pub fn merge_toggles(existing: &[Toggle], detected: &[ToggleMarker]) -> Vec<Toggle> {
    let by_name: HashMap<&str, &Toggle> = existing.iter().map(|t| (t.name.as_str(), t)).collect();
    detected
        .iter()
        .map(|marker| match by_name.get(marker.name.as_str()) {
            Some(known) => (*known).clone(),
            None => Toggle::new(marker.name.clone()),
        })
        .collect()
}

/// Required variables that have no non-empty value
pub fn missing_required_variables(
    variables: &[Variable],
    values: &HashMap<String, String>,
) -> Vec<String> {
    variables
        .iter()
        .filter(|variable| variable.required)
        .filter(|variable| values.get(&variable.name).map_or(true, |value| value.is_empty()))
        .map(|variable| variable.name.clone())
        .collect()
}
