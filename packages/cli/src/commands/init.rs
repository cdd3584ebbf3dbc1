use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::files::{write_json, EmbedFile};
use anyhow::Result;
use blockcast_fingerprint::SourceRecord;
use blockcast_transform::{Audience, EmbedConfig};
use blockcast_tree::parse_tree;
use clap::Args;
use colored::Colorize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "sources")]
    pub source_dir: String,

    /// Embed directory
    #[arg(short, long, default_value = "embeds")]
    pub embed_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

const EXAMPLE_CONTENT: &str = r#"{
  "type": "doc",
  "content": [
    {
      "type": "paragraph",
      "content": [
        { "type": "text", "text": "{{client}} gets {{toggle:bonus}}a bonus{{/toggle:bonus}}." }
      ]
    }
  ]
}"#;

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing blockcast project...".bright_blue().bold());

    let config = Config {
        source_dir: args.source_dir.clone(),
        embed_dir: args.embed_dir.clone(),
        out_dir: "dist".to_string(),
        audience: Audience::Internal,
    };

    let source_dir = config.source_dir(cwd);
    let example_source = source_dir.join("welcome.json");
    if !example_source.exists() {
        let mut source = SourceRecord::new("welcome", "Welcome", parse_tree(EXAMPLE_CONTENT)?);
        source.category = "onboarding".to_string();
        write_json(&example_source, &source)?;
        println!("  {} Created {}/welcome.json", "✓".green(), args.source_dir);
    }

    let embed_dir = config.embed_dir(cwd);
    fs::create_dir_all(&embed_dir)?;
    let example_embed = embed_dir.join("welcome-acme.json");
    if !example_embed.exists() {
        let embed = EmbedFile {
            id: "welcome-acme".to_string(),
            source_id: "welcome".to_string(),
            config: EmbedConfig {
                variable_values: HashMap::from([("client".to_string(), "Acme".to_string())]),
                toggle_states: HashMap::from([("bonus".to_string(), true)]),
                ..EmbedConfig::default()
            },
        };
        write_json(&example_embed, &embed)?;
        println!("  {} Created {}/welcome-acme.json", "✓".green(), args.embed_dir);
    }

    write_json(&config_path, &config)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/welcome.json", args.source_dir);
    println!("  2. Run: blockcast build");
    println!("  3. Check output in dist/");

    Ok(())
}
