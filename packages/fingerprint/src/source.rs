use blockcast_tree::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named substitution slot, detected from `{{name}}` markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            example: None,
            required: true,
        }
    }
}

/// A named conditional block, detected from `{{toggle:name}}` markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Toggle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationLink {
    pub url: String,
    #[serde(default)]
    pub anchor: String,
}

/// A reusable content block and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub content: Node,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub toggles: Vec<Toggle>,
    #[serde(default)]
    pub documentation_links: Vec<DocumentationLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: Node) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            content,
            variables: Vec::new(),
            toggles: Vec::new(),
            documentation_links: Vec::new(),
            content_hash: None,
            source_page_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}
