use crate::files::{read_json, write_json};
use anyhow::Result;
use blockcast_fingerprint::{compute_content_fingerprint, refresh_content_hash, SourceRecord};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FingerprintArgs {
    /// Source record file
    pub source: String,

    /// Store the fingerprint as the record's contentHash
    #[arg(short, long)]
    pub write: bool,
}

pub fn fingerprint(args: FingerprintArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.source);

    let mut source: SourceRecord = read_json(&path)?;
    if !args.write {
        println!("{}", compute_content_fingerprint(&source)?);
        return Ok(());
    }

    let changed = refresh_content_hash(&mut source)?;
    write_json(&path, &source)?;
    let hash = source.content_hash.as_deref().unwrap_or_default();
    if changed {
        println!("{} {} {}", "✓".green(), args.source, hash);
    } else {
        println!("{} {} {}", "=".dimmed(), args.source, hash.dimmed());
    }
    Ok(())
}
