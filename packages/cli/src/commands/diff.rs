use crate::files::{read_json, EmbedFile};
use anyhow::Result;
use blockcast_fingerprint::SourceRecord;
use blockcast_reconcile::{reconcile_embed, DiffKind, DiffLine, StalenessBasis};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Source record file
    pub source: String,

    /// Embed file
    pub embed: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn diff(args: DiffArgs, cwd: &str) -> Result<()> {
    let source: SourceRecord = read_json(&PathBuf::from(cwd).join(&args.source))?;
    let embed: EmbedFile = read_json(&PathBuf::from(cwd).join(&args.embed))?;

    let result = reconcile_embed(&source, &embed.config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.verdict.stale {
        println!(
            "{} {} is up to date ({})",
            "✓".green(),
            embed.id,
            describe(result.verdict.basis).dimmed()
        );
        return Ok(());
    }

    println!(
        "{} {} is behind {} ({})",
        "⚠️".yellow(),
        embed.id.bold(),
        source.name,
        describe(result.verdict.basis)
    );

    let Some(diff) = result.diff else {
        println!("{}", "No synced copy stored, cannot show changes".dimmed());
        return Ok(());
    };

    println!();
    for line in &diff.line_diff {
        println!("{}", format_line(line));
    }
    println!();
    println!(
        "{} added, {} removed, {} unchanged",
        diff.summary.added.to_string().green(),
        diff.summary.removed.to_string().red(),
        diff.summary.unchanged
    );

    Ok(())
}

fn describe(basis: StalenessBasis) -> &'static str {
    match basis {
        StalenessBasis::FingerprintMatch => "fingerprints match",
        StalenessBasis::FingerprintMismatch => "content fingerprint changed",
        StalenessBasis::TimestampNewer => "source updated after last sync",
        StalenessBasis::TimestampNotNewer => "no update since last sync",
        StalenessBasis::Unknown => "no sync data",
    }
}

fn format_line(line: &DiffLine) -> String {
    match line.kind {
        DiffKind::Added => format!("+ {}", line.text).green().to_string(),
        DiffKind::Removed => format!("- {}", line.text).red().to_string(),
        DiffKind::Unchanged => format!("  {}", line.text).dimmed().to_string(),
    }
}
