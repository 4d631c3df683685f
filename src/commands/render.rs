use crate::action::ToolRegistry;
use crate::cli::{Cli, RenderArgs};
use crate::config::Config;
use crate::exemplar::Exemplar;
use crate::library::Library;
use crate::prompt::PromptBuilder;
use eyre::Result;
use std::path::Path;

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let work_dir = Path::new(".");
    let config = Config::load(cli.config.as_ref(), work_dir)?;
    let library = Library::load(&config.exemplars)?;
    let registry = ToolRegistry::new(config.tools.clone());

    let exemplars = select(&library, &args.exemplars)?;
    let builder = PromptBuilder::from_config(&config.prompt)?;
    let prompt = builder.render(&args.claim, &exemplars, registry.tools())?;

    print!("{}", prompt);
    Ok(())
}

/// The named exemplars in the order given, or the whole library when no names are given
fn select<'a>(library: &'a Library, names: &[String]) -> Result<Vec<&'a Exemplar>> {
    if library.is_empty() {
        return Err(eyre::eyre!("No exemplars available to render"));
    }
    if names.is_empty() {
        return Ok(library.iter().map(|e| &e.exemplar).collect());
    }
    names
        .iter()
        .map(|name| {
            library
                .get(name)
                .map(|e| &e.exemplar)
                .ok_or_else(|| eyre::eyre!("Unknown exemplar '{}'", name))
        })
        .collect()
}
