use crate::action::{ActionCall, ToolRegistry, parse_actions};
use crate::cli::{ActionsArgs, Cli};
use crate::config::Config;
use crate::response::{ResponseActions, read_response};
use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

pub fn run(cli: &Cli, args: &ActionsArgs) -> Result<()> {
    let work_dir = Path::new(".");
    let config = Config::load(cli.config.as_ref(), work_dir)?;
    let registry = ToolRegistry::new(config.tools.clone());

    let response = match &args.input {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read response {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read response from stdin")?,
    };

    let past = match &args.past {
        Some(path) => load_past(path)?,
        None => Vec::new(),
    };

    let result = read_response(&response, &past, &config.response.refusal_prefixes);

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize actions")?;
        println!("{}", json);
    } else {
        print_result(&result, &registry);
    }

    Ok(())
}

fn load_past(path: &Path) -> Result<Vec<ActionCall>> {
    let content = fs::read_to_string(path).context(format!("Failed to read past actions {}", path.display()))?;
    let past = parse_actions(&content);
    log::debug!("Loaded {} past actions from {}", past.len(), path.display());
    Ok(past)
}

fn print_result(result: &ResponseActions, registry: &ToolRegistry) {
    match result {
        ResponseActions::Refused { prefix } => {
            println!("{} Model refused to answer (reply starts with \"{}\")", "⚠".yellow(), prefix);
        }
        ResponseActions::NoActions => {
            println!("{} No actions found in response", "✗".red());
        }
        ResponseActions::Actions { actions, duplicates } => {
            for action in actions {
                match registry.resolve(action) {
                    Ok(_) => println!("{} {}", "✓".green(), action),
                    Err(e) => println!("{} {} {}", "✗".red(), action, format!("({})", e).dimmed()),
                }
            }
            for action in duplicates {
                println!("{} {} {}", "·".dimmed(), action, "(duplicate)".dimmed());
            }
        }
    }
}
