mod commands;
mod config;
mod files;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    build, diff, fingerprint, init, render, scan, BuildArgs, DiffArgs, FingerprintArgs, InitArgs,
    RenderArgs, ScanArgs,
};
use tracing_subscriber::EnvFilter;

/// Blockcast CLI - render reusable content blocks into their embeds
#[derive(Parser, Debug)]
#[command(name = "blockcast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log transformation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new blockcast project
    Init(InitArgs),

    /// Print the content fingerprint of a source
    Fingerprint(FingerprintArgs),

    /// List the variables and toggles a source uses
    Scan(ScanArgs),

    /// Render one embed of a source
    Render(RenderArgs),

    /// Check whether an embed is behind its source and show what changed
    Diff(DiffArgs),

    /// Render every embed in the project
    Build(BuildArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Fingerprint(args) => fingerprint(args, &cwd),
        Command::Scan(args) => scan(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Diff(args) => diff(args, &cwd),
        Command::Build(args) => build(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
