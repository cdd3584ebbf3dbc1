use crate::config::Config;
use crate::files::{find_json_files, load_sources, read_json, write_json, EmbedFile};
use anyhow::{anyhow, Result};
use blockcast_fingerprint::SourceRecord;
use blockcast_reconcile::reconcile_embed;
use blockcast_transform::{render_embed, Audience};
use clap::Args;
use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Project directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: String,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// internal (with notes) or external (overrides config)
    #[arg(short, long)]
    pub audience: Option<Audience>,
}

/// What happened to one embed during a build
struct Built {
    output: PathBuf,
    stale: bool,
}

pub fn build(args: BuildArgs, cwd: &str) -> Result<()> {
    let root = PathBuf::from(cwd).join(&args.path);
    let root = root.to_string_lossy();
    let config = Config::load(&root)?;
    let source_dir = config.source_dir(&root);
    let embed_dir = config.embed_dir(&root);
    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.out_dir(&root),
    };
    let audience = args.audience.unwrap_or(config.audience);

    if !source_dir.exists() {
        return Err(anyhow!("Source directory does not exist: {:?}", source_dir));
    }

    println!("{}", "🔨 Rendering embeds...".bright_blue().bold());

    let sources = load_sources(&source_dir)?;
    let embed_files = find_json_files(&embed_dir);
    if embed_files.is_empty() {
        println!("{}", "⚠️  No embed files found".yellow());
        return Ok(());
    }
    println!("Found {} sources, {} embeds", sources.len(), embed_files.len());

    let mut success_count = 0;
    let mut stale_count = 0;
    let mut error_count = 0;

    for embed_file in &embed_files {
        let relative_path = embed_file.strip_prefix(&embed_dir).unwrap_or(embed_file);
        match build_embed(embed_file, &sources, &out_dir, audience) {
            Ok(built) => {
                success_count += 1;
                let mut line = format!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    built.output.display()
                );
                if built.stale {
                    stale_count += 1;
                    line.push_str(&format!(" {}", "(stale)".yellow()));
                }
                println!("{}", line);
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    info!(success_count, stale_count, error_count, "Build finished");
    println!();
    if error_count == 0 {
        println!("{} Rendered {} embeds", "✅".green(), success_count);
    } else {
        println!(
            "{} Rendered {} embeds, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }
    if stale_count > 0 {
        println!(
            "{} {} embeds are behind their source, run `blockcast diff` for details",
            "⚠️".yellow(),
            stale_count
        );
    }

    Ok(())
}

fn build_embed(
    embed_path: &Path,
    sources: &HashMap<String, SourceRecord>,
    out_dir: &Path,
    audience: Audience,
) -> Result<Built> {
    let embed: EmbedFile = read_json(embed_path)?;
    let source = sources
        .get(&embed.source_id)
        .ok_or_else(|| anyhow!("Unknown source '{}'", embed.source_id))?;

    let rendered = render_embed(&source.content, &embed.config, audience);
    let output = out_dir.join(format!("{}.json", embed.id));
    write_json(&output, &rendered)?;

    let stale = reconcile_embed(source, &embed.config).verdict.stale;
    Ok(Built { output, stale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcast_tree::{flatten_text, Node};
    use std::fs;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_renders_each_embed() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "sources/offer.json",
            r#"{
                "id": "offer",
                "name": "Offer",
                "content": { "type": "doc", "content": [
                    { "type": "paragraph", "content": [
                        { "type": "text", "text": "{{client}} gets {{toggle:bonus}}a bonus{{/toggle:bonus}}." }
                    ]}
                ]}
            }"#,
        );
        write(
            dir.path(),
            "embeds/acme.json",
            r#"{ "id": "acme", "sourceId": "offer", "variableValues": { "client": "Acme" }, "toggleStates": { "bonus": false } }"#,
        );
        write(
            dir.path(),
            "embeds/broken.json",
            r#"{ "id": "broken", "sourceId": "missing" }"#,
        );

        let args = BuildArgs {
            path: ".".to_string(),
            out_dir: None,
            audience: Some(Audience::External),
        };
        build(args, dir.path().to_str().unwrap()).unwrap();

        let rendered: Node = read_json(&dir.path().join("dist/acme.json")).unwrap();
        assert_eq!(flatten_text(&rendered), "Acme gets .");
        assert!(!dir.path().join("dist/broken.json").exists());
    }

    #[test]
    fn test_build_requires_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = BuildArgs {
            path: ".".to_string(),
            out_dir: None,
            audience: None,
        };
        assert!(build(args, dir.path().to_str().unwrap()).is_err());
    }
}
