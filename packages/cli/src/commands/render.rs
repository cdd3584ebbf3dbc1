use crate::config::Config;
use crate::files::{read_json, write_json, EmbedFile};
use anyhow::{anyhow, Result};
use blockcast_fingerprint::SourceRecord;
use blockcast_transform::{missing_required_variables, render_embed, Audience};
use blockcast_tree::flatten_text;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Source record file
    pub source: String,

    /// Embed file
    pub embed: String,

    /// internal (with notes) or external (overrides config)
    #[arg(short, long)]
    pub audience: Option<Audience>,

    /// Write the rendered tree to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<String>,

    /// Print plain text instead of the tree
    #[arg(long)]
    pub text: bool,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let source: SourceRecord = read_json(&PathBuf::from(cwd).join(&args.source))?;
    let embed: EmbedFile = read_json(&PathBuf::from(cwd).join(&args.embed))?;

    if embed.source_id != source.id {
        return Err(anyhow!(
            "Embed {} references source '{}', not '{}'",
            embed.id,
            embed.source_id,
            source.id
        ));
    }

    let missing = missing_required_variables(&source.variables, &embed.config.variable_values);
    if !missing.is_empty() {
        eprintln!(
            "{} Missing required variables: {}",
            "⚠️".yellow(),
            missing.join(", ").yellow()
        );
    }

    let audience = args.audience.unwrap_or(config.audience);
    let rendered = render_embed(&source.content, &embed.config, audience);

    match (&args.out, args.text) {
        (Some(out), _) => {
            let out_path = PathBuf::from(cwd).join(out);
            write_json(&out_path, &rendered)?;
            eprintln!("{} {} → {}", "✓".green(), embed.id, out_path.display());
        }
        (None, true) => println!("{}", flatten_text(&rendered)),
        (None, false) => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }

    Ok(())
}
