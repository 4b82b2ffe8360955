mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{export, import, validate, ExportArgs, ImportArgs, ValidateArgs};

/// Pagecraft CLI - project tooling for the Pagecraft site builder
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a project file to a portable envelope
    Export(ExportArgs),

    /// Import an export envelope into a project file
    Import(ImportArgs),

    /// Validate a project file (save-time or publish gate)
    Validate(ValidateArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Export(args) => export(args),
        Command::Import(args) => import(args),
        Command::Validate(args) => validate(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
