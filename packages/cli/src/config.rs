use blockcast_transform::Audience;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "blockcast.config.json";

/// Blockcast project configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing source records
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Directory containing embed files
    #[serde(default = "default_embed_dir")]
    pub embed_dir: String,

    /// Where rendered embeds are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Audience used when a command does not pass one
    #[serde(default)]
    pub audience: Audience,
}

fn default_source_dir() -> String {
    "sources".to_string()
}

fn default_embed_dir() -> String {
    "embeds".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn source_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.source_dir)
    }

    pub fn embed_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.embed_dir)
    }

    pub fn out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            embed_dir: default_embed_dir(),
            out_dir: default_out_dir(),
            audience: Audience::default(),
        }
    }
}
