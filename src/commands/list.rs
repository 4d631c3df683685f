use crate::action::ToolRegistry;
use crate::cli::Cli;
use crate::config::Config;
use crate::library::{Entry, Library, Origin};
use chrono::{DateTime, Utc};
use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run(cli: &Cli) -> Result<()> {
    let work_dir = Path::new(".");
    let config = Config::load(cli.config.as_ref(), work_dir)?;
    let library = Library::load(&config.exemplars)?;
    let registry = ToolRegistry::new(config.tools.clone());

    println!();
    println!("{}", "Exemplars:".bold());
    if library.is_empty() {
        println!("  {} No exemplars found.", "·".dimmed());
    }
    for entry in library.iter() {
        print_entry(entry, &registry)?;
    }
    println!();

    Ok(())
}

fn print_entry(entry: &Entry, registry: &ToolRegistry) -> Result<()> {
    let exemplar = &entry.exemplar;
    println!("  {}", exemplar.name.cyan().bold());

    match &entry.origin {
        Origin::Builtin => println!("    Source: {}", "built-in".dimmed()),
        Origin::File(path) => {
            println!("    Source: {}", path.display());
            if let Some(modified) = modified_at(path)? {
                println!("    Modified: {}", modified.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
    }

    let tools: Vec<String> = exemplar
        .tools()
        .into_iter()
        .map(|tool| {
            if registry.tools().iter().any(|t| t.name == tool) {
                tool.to_string()
            } else {
                format!("{} (unknown)", tool).red().to_string()
            }
        })
        .collect();
    println!("    Tools: {}", tools.join(", "));
    println!("    Actions: {}", exemplar.actions.len());
    Ok(())
}

fn modified_at(path: &Path) -> Result<Option<DateTime<Utc>>> {
    let metadata = fs::metadata(path).context(format!("Failed to stat {}", path.display()))?;
    Ok(metadata.modified().ok().map(DateTime::<Utc>::from))
}
