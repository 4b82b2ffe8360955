use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_document::ComponentRegistry;
use pagecraft_serializer::{export_project, project_from_json};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project file to export
    pub input: PathBuf,

    /// Output path for the export envelope
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn export(args: ExportArgs) -> Result<()> {
    println!("📦 {} Pagecraft Export", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let registry = ComponentRegistry::new();
    let (project, report) = project_from_json(&json, &registry)?;

    for warning in report.warnings() {
        println!("   {} {}", "warning".yellow().bold(), warning.message);
    }

    let envelope = export_project(&project)?;
    let output = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("export.json");
        path
    });
    fs::write(&output, envelope)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    println!();
    println!("✨ {} Export complete!", "Done".green().bold());
    println!("   Project: {} ({} components)", project.name, project.component_count());
    println!("   Output:  {}", output.display());

    Ok(())
}
