use crate::files::{read_json, write_json};
use anyhow::Result;
use blockcast_fingerprint::SourceRecord;
use blockcast_transform::{
    index_paragraphs, merge_toggles, merge_variables, scan_toggle_markers, scan_variable_markers,
};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Source record file
    pub source: String,

    /// Rewrite the record's variables and toggles from the markers found
    #[arg(short, long)]
    pub write: bool,

    /// Also list addressable paragraphs
    #[arg(short, long)]
    pub paragraphs: bool,
}

pub fn scan(args: ScanArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.source);
    let mut source: SourceRecord = read_json(&path)?;

    let variable_names = scan_variable_markers(&source.content);
    let toggle_markers = scan_toggle_markers(&source.content);
    let variables = merge_variables(&source.variables, &variable_names);
    let toggles = merge_toggles(&source.toggles, &toggle_markers);

    println!("{} {}", "Source".bright_blue().bold(), source.name);
    println!();
    println!("{} ({})", "Variables".bold(), variables.len());
    for variable in &variables {
        let known = source.variables.iter().any(|v| v.name == variable.name);
        let flag = if known { "•".normal() } else { "+".green() };
        let required = if variable.required { " (required)" } else { "" };
        println!("  {} {}{}", flag, variable.name, required.dimmed());
    }
    for dropped in source.variables.iter().filter(|v| !variable_names.contains(&v.name)) {
        println!("  {} {}", "-".red(), dropped.name.dimmed());
    }

    println!();
    println!("{} ({})", "Toggles".bold(), toggles.len());
    for toggle in &toggles {
        let known = source.toggles.iter().any(|t| t.name == toggle.name);
        let flag = if known { "•".normal() } else { "+".green() };
        println!("  {} {}", flag, toggle.name);
    }
    for dropped in source
        .toggles
        .iter()
        .filter(|t| !toggle_markers.iter().any(|marker| marker.name == t.name))
    {
        println!("  {} {}", "-".red(), dropped.name.dimmed());
    }

    if args.paragraphs {
        println!();
        println!("{}", "Paragraphs".bold());
        for paragraph in index_paragraphs(&source.content) {
            println!("  {:>3}  {}", paragraph.index, paragraph.last_sentence.dimmed());
        }
    }

    if args.write {
        source.variables = variables;
        source.toggles = toggles;
        write_json(&path, &source)?;
        println!();
        println!("{} Updated {}", "✓".green(), args.source);
    }

    Ok(())
}
