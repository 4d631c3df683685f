use crate::cli::{Cli, ShowArgs};
use crate::config::Config;
use crate::library::Library;
use colored::*;
use eyre::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

pub fn run(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let work_dir = Path::new(".");
    let config = Config::load(cli.config.as_ref(), work_dir)?;
    let library = Library::load(&config.exemplars)?;

    let mut stdout = io::stdout().lock();
    show(&library, &args.name, args.json, &mut stdout)
}

pub fn show(library: &Library, name: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let entry = library
        .get(name)
        .ok_or_else(|| eyre::eyre!("Unknown exemplar '{}'. Run {} to see what exists.", name, "fcx list".cyan()))?;

    if json {
        let json = serde_json::to_string_pretty(&entry.exemplar).context("Failed to serialize exemplar")?;
        writeln!(out, "{}", json).context("Failed to write exemplar")?;
    } else {
        // Exact bytes, no trailing newline added
        write!(out, "{}", entry.exemplar).context("Failed to write exemplar")?;
    }
    out.flush().context("Failed to flush output")?;

    Ok(())
}
