use anyhow::{Context, Result};
use blockcast_fingerprint::SourceRecord;
use blockcast_transform::EmbedConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// An embed as stored on disk: which source it shows, and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedFile {
    pub id: String,
    pub source_id: String,
    #[serde(flatten)]
    pub config: EmbedConfig,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}

pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

/// Load every source record under `dir`, keyed by id
pub fn load_sources(dir: &Path) -> Result<HashMap<String, SourceRecord>> {
    let mut sources = HashMap::new();
    for path in find_json_files(dir) {
        let source: SourceRecord = read_json(&path)?;
        if source.id.is_empty() {
            warn!(path = %path.display(), "Source without an id, skipped");
            continue;
        }
        debug!(id = %source.id, path = %path.display(), "Loaded source");
        if let Some(previous) = sources.insert(source.id.clone(), source) {
            warn!(id = %previous.id, path = %path.display(), "Duplicate source id, last file wins");
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_file_flattens_config() {
        let json = r#"{
            "id": "welcome-acme",
            "sourceId": "welcome",
            "variableValues": { "client": "Acme" },
            "toggleStates": { "bonus": false }
        }"#;
        let embed: EmbedFile = serde_json::from_str(json).unwrap();
        assert_eq!(embed.source_id, "welcome");
        assert_eq!(embed.config.variable_values["client"], "Acme");
        assert_eq!(embed.config.toggle_states.get("bonus"), Some(&false));
    }

    #[test]
    fn test_load_sources_by_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/terms.json"),
            r#"{ "id": "terms", "name": "Terms", "content": { "type": "doc", "content": [] } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sources = load_sources(dir.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources["terms"].name, "Terms");
    }
}
