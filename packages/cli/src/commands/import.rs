use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_document::ComponentRegistry;
use pagecraft_serializer::{import_project, project_to_json};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Export envelope to import
    pub input: PathBuf,

    /// Output path for the imported project file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep original ids and assign this owner; omit to re-mint all ids
    #[arg(long)]
    pub owner: Option<String>,
}

pub fn import(args: ImportArgs) -> Result<()> {
    println!("📥 {} Pagecraft Import", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let registry = ComponentRegistry::new();
    let (project, report) = import_project(&json, args.owner.as_deref(), &registry)?;

    for warning in report.warnings() {
        println!("   {} {}", "warning".yellow().bold(), warning.message);
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.pagecraft.json", project.id)));
    fs::write(&output, project_to_json(&project)?)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    println!();
    println!("✨ {} Import complete!", "Done".green().bold());
    println!(
        "   Project: {} ({} pages, {} components)",
        project.name,
        project.pages.len(),
        project.component_count()
    );
    println!("   Output:  {}", output.display());

    Ok(())
}
