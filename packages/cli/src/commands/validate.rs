use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_document::ComponentRegistry;
use pagecraft_serializer::project_from_json;
use pagecraft_validator::{validate_publish_content, DiagnosticLevel};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project file to validate
    pub input: PathBuf,

    /// Run the stricter publish gate instead of the save-time checks
    #[arg(long)]
    pub publish: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    println!("🔍 {} Pagecraft Validator", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    if args.publish {
        println!("   Gate:  publish");
    }
    println!();

    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let registry = ComponentRegistry::new();
    // The load report already carries the project-level pass; the publish
    // gate only adds its content checks on top
    let (project, mut report) = project_from_json(&json, &registry)?;
    if args.publish {
        report.extend(validate_publish_content(&project, &registry));
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for diagnostic in &report.diagnostics {
            let level_str = match diagnostic.level {
                DiagnosticLevel::Error => "error".red().bold(),
                DiagnosticLevel::Warning => "warning".yellow().bold(),
            };
            match &diagnostic.component_id {
                Some(id) => println!(
                    "  {} [{}] {} ({})",
                    level_str, diagnostic.rule, diagnostic.message, id
                ),
                None => println!("  {} [{}] {}", level_str, diagnostic.rule, diagnostic.message),
            }
            if let Some(suggestion) = &diagnostic.suggestion {
                println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
            }
        }
        if !report.diagnostics.is_empty() {
            println!();
        }
    }

    println!(
        "✨ {} Validation complete!",
        if errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    if errors > 0 {
        println!("   {} {}", "Errors:".red(), errors);
    }
    if warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), warnings);
    }
    if errors == 0 && warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
