//! JSON in, JSON out. The bindings in `lib.rs` wrap these so hosts only ever
//! exchange strings.

use blockcast_fingerprint::{fingerprint_value, FingerprintError};
use blockcast_reconcile::{build_ghost_diff, check_staleness, StalenessVerdict};
use blockcast_transform::{
    filter_by_toggles, ghost_filter, index_paragraphs, insert_annotations,
    insert_custom_paragraphs, render_embed, scan_toggle_markers, scan_variable_markers,
    strip_annotations, substitute_variables, Audience, CustomInsertion, EmbedConfig,
    InternalNote,
};
use blockcast_tree::{normalize_tree, Node};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid {what}: {source}")]
    Input {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Output(#[source] serde_json::Error),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Unknown audience: {0}")]
    Audience(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn input<T: DeserializeOwned>(json: &str, what: &'static str) -> ApiResult<T> {
    serde_json::from_str(json).map_err(|source| ApiError::Input { what, source })
}

fn output<T: Serialize>(value: &T) -> ApiResult<String> {
    serde_json::to_string(value).map_err(ApiError::Output)
}

/// Unparsable timestamps are treated as missing
fn timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(|raw| raw.parse().ok())
}

pub fn normalize_tree_json(json: &str) -> ApiResult<String> {
    let value: Value = input(json, "JSON")?;
    output(&normalize_tree(&value))
}

pub fn content_fingerprint_json(source_json: &str) -> ApiResult<String> {
    let value: Value = input(source_json, "source")?;
    Ok(fingerprint_value(&value)?)
}

pub fn scan_variables_json(tree_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    output(&scan_variable_markers(&tree))
}

pub fn scan_toggles_json(tree_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    output(&scan_toggle_markers(&tree))
}

pub fn filter_by_toggles_json(tree_json: &str, states_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let states: HashMap<String, bool> = input(states_json, "toggle states")?;
    output(&filter_by_toggles(&tree, &states))
}

pub fn ghost_filter_json(tree_json: &str, states_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let states: HashMap<String, bool> = input(states_json, "toggle states")?;
    output(&ghost_filter(&tree, &states))
}

pub fn substitute_variables_json(tree_json: &str, values_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let values: HashMap<String, String> = input(values_json, "variable values")?;
    output(&substitute_variables(&tree, &values))
}

pub fn index_paragraphs_json(tree_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    output(&index_paragraphs(&tree))
}

pub fn insert_custom_paragraphs_json(tree_json: &str, insertions_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let insertions: Vec<CustomInsertion> = input(insertions_json, "custom insertions")?;
    output(&insert_custom_paragraphs(&tree, &insertions))
}

pub fn insert_annotations_json(tree_json: &str, notes_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let notes: Vec<InternalNote> = input(notes_json, "internal notes")?;
    output(&insert_annotations(&tree, &notes))
}

pub fn strip_annotations_json(tree_json: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    output(&strip_annotations(&tree))
}

pub fn staleness(
    source_fingerprint: Option<&str>,
    synced_fingerprint: Option<&str>,
    source_updated_at: Option<&str>,
    last_synced_at: Option<&str>,
) -> StalenessVerdict {
    check_staleness(
        source_fingerprint,
        synced_fingerprint,
        timestamp(source_updated_at),
        timestamp(last_synced_at),
    )
}

pub fn ghost_diff_json(
    old_json: &str,
    new_json: &str,
    values_json: &str,
    states_json: &str,
) -> ApiResult<String> {
    let old: Node = input(old_json, "old tree")?;
    let new: Node = input(new_json, "new tree")?;
    let values: HashMap<String, String> = input(values_json, "variable values")?;
    let states: HashMap<String, bool> = input(states_json, "toggle states")?;
    output(&build_ghost_diff(&old, &new, &values, &states))
}

pub fn render_embed_json(tree_json: &str, config_json: &str, audience: &str) -> ApiResult<String> {
    let tree: Node = input(tree_json, "tree")?;
    let config: EmbedConfig = input(config_json, "embed config")?;
    let audience: Audience = audience.parse().map_err(ApiError::Audience)?;
    output(&render_embed(&tree, &config, audience))
}
