use crate::error::{FingerprintError, FingerprintResult};
use crate::source::{DocumentationLink, SourceRecord, Toggle, Variable};
use blockcast_tree::{canonical_string, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Source fields that take part in the fingerprint. Identity, timestamps and
/// page location are deliberately absent.
pub const PROJECTION_FIELDS: [&str; 6] = [
    "content",
    "name",
    "category",
    "variables",
    "toggles",
    "documentationLinks",
];

/// The hashed view of a source record.
///
/// Typed records and host JSON both pass through this one shape, so defaults
/// (`category: ""`, `required: false`, empty `attrs`/`marks` omitted) are
/// applied identically whichever side produced the record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Projection<'a> {
    content: Option<&'a Node>,
    name: &'a str,
    category: &'a str,
    variables: &'a [Variable],
    toggles: &'a [Toggle],
    documentation_links: &'a [DocumentationLink],
}

impl<'a> From<&'a SourceRecord> for Projection<'a> {
    fn from(source: &'a SourceRecord) -> Self {
        Self {
            content: Some(&source.content),
            name: &source.name,
            category: &source.category,
            variables: &source.variables,
            toggles: &source.toggles,
            documentation_links: &source.documentation_links,
        }
    }
}

/// Semantic fields of a host record. Missing and `null` fields fall back to
/// the same defaults `SourceRecord` uses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HostFields {
    content: Option<Node>,
    name: Option<String>,
    category: Option<String>,
    variables: Option<Vec<Variable>>,
    toggles: Option<Vec<Toggle>>,
    documentation_links: Option<Vec<DocumentationLink>>,
}

impl HostFields {
    fn projection(&self) -> Projection<'_> {
        Projection {
            content: self.content.as_ref(),
            name: self.name.as_deref().unwrap_or_default(),
            category: self.category.as_deref().unwrap_or_default(),
            variables: self.variables.as_deref().unwrap_or_default(),
            toggles: self.toggles.as_deref().unwrap_or_default(),
            documentation_links: self.documentation_links.as_deref().unwrap_or_default(),
        }
    }
}

/// Build the fingerprint input from a source record in JSON form.
///
/// Missing fields take the defaults of [`SourceRecord`]; a missing `content`
/// becomes `null`.
pub fn fingerprint_projection(source: &Value) -> FingerprintResult<Value> {
    let fields = HostFields::deserialize(source).map_err(FingerprintError::Decode)?;
    serde_json::to_value(fields.projection()).map_err(FingerprintError::Encode)
}

/// Fingerprint an untyped source record
#[instrument(skip(source))]
pub fn fingerprint_value(source: &Value) -> FingerprintResult<String> {
    let fields = HostFields::deserialize(source).map_err(FingerprintError::Decode)?;
    fingerprint_projected(&fields.projection())
}

/// Fingerprint a source record.
///
/// Two snapshots that differ only in field order, identity or timestamps give
/// the same fingerprint.
#[instrument(skip_all, fields(id = %source.id))]
pub fn compute_content_fingerprint(source: &SourceRecord) -> FingerprintResult<String> {
    fingerprint_projected(&Projection::from(source))
}

fn fingerprint_projected(projection: &Projection<'_>) -> FingerprintResult<String> {
    let value = serde_json::to_value(projection).map_err(FingerprintError::Encode)?;
    let canonical = canonical_string(&value).map_err(FingerprintError::Canonical)?;
    let digest = sha256_hex(canonical.as_bytes());
    debug!(bytes = canonical.len(), fingerprint = %digest, "Computed content fingerprint");
    Ok(digest)
}

/// Recompute `content_hash` after an edit. Returns true when it changed.
pub fn refresh_content_hash(source: &mut SourceRecord) -> FingerprintResult<bool> {
    let fingerprint = compute_content_fingerprint(source)?;
    let changed = source.content_hash.as_deref() != Some(fingerprint.as_str());
    source.content_hash = Some(fingerprint);
    Ok(changed)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
