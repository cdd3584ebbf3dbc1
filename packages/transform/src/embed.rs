use crate::annotations::InternalNote;
use crate::insertions::CustomInsertion;
use blockcast_tree::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who a render is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Internal viewers, annotations included
    #[default]
    Internal,
    /// Client-facing output, annotations omitted
    External,
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "internal" => Ok(Audience::Internal),
            "external" => Ok(Audience::External),
            other => Err(format!("Unknown audience '{}'. Use: internal or external", other)),
        }
    }
}

/// Per-instance settings of an embed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    #[serde(default)]
    pub variable_values: HashMap<String, String>,
    #[serde(default)]
    pub toggle_states: HashMap<String, bool>,
    #[serde(default)]
    pub custom_insertions: Vec<CustomInsertion>,
    #[serde(default)]
    pub internal_notes: Vec<InternalNote>,
    /// Source fingerprint captured when the embed last accepted an update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_content_hash: Option<String>,
    /// Source content at last sync, kept for diffing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_content: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl EmbedConfig {
    /// Accept the current source: record its fingerprint and content
    pub fn mark_synced(&mut self, fingerprint: impl Into<String>, content: &Node, at: DateTime<Utc>) {
        self.synced_content_hash = Some(fingerprint.into());
        self.synced_content = Some(content.clone());
        self.last_synced_at = Some(at);
    }
}
