use crate::cli::Cli;
use crate::config::Config;
use crate::templates::PROMPT_TEMPLATE;
use crate::templates::exemplars::WIKI_DUMP;
use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(cli: &Cli) -> Result<()> {
    let work_dir = Path::new(".");

    init(work_dir, cli.config.as_ref())
}

pub fn init(work_dir: &Path, config_path: Option<&PathBuf>) -> Result<()> {
    let fcx_dir = Config::local_config_dir(work_dir);

    if fcx_dir.exists() {
        println!(
            "{} .fcx/ already exists. Use {} to reinitialize.",
            "⚠".yellow(),
            "rm -rf .fcx".cyan()
        );
        return Ok(());
    }

    fs::create_dir_all(&fcx_dir).context("Failed to create .fcx directory")?;
    println!("{} Created {}", "✓".green(), ".fcx/".cyan());

    // Start from an explicit or global config, then point it at the local files
    let mut config = match config_path {
        Some(path) => Config::load(Some(path), work_dir)?,
        None => Config::load_global()?,
    };
    config.exemplars.dir = Some(PathBuf::from("exemplars"));
    config.prompt.template = Some(PathBuf::from("PROMPT.md"));
    config.save_local(work_dir)?;
    println!("{} Created {}", "✓".green(), ".fcx/fcx.yml".cyan());

    let prompt_path = fcx_dir.join("PROMPT.md");
    fs::write(&prompt_path, PROMPT_TEMPLATE).context("Failed to write PROMPT.md")?;
    println!("{} Created {}", "✓".green(), ".fcx/PROMPT.md".cyan());

    let exemplar_dir = fcx_dir.join("exemplars");
    fs::create_dir_all(&exemplar_dir).context("Failed to create exemplars directory")?;
    fs::write(exemplar_dir.join("wiki_dump.md"), WIKI_DUMP).context("Failed to write wiki_dump.md")?;
    println!("{} Created {}", "✓".green(), ".fcx/exemplars/wiki_dump.md".cyan());

    println!();
    println!("{}", "fcx initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add exemplars to {}", ".fcx/exemplars/".cyan());
    println!("  2. Run {} to validate them", "fcx check".cyan());
    println!("  3. Run {} to build a prompt", "fcx render --claim <text>".cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Library, Origin};
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_directory_structure() {
        let dir = tempdir().unwrap();
        init(dir.path(), None).unwrap();

        assert!(dir.path().join(".fcx").exists());
        assert!(dir.path().join(".fcx/fcx.yml").exists());
        assert!(dir.path().join(".fcx/PROMPT.md").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join(".fcx/exemplars/wiki_dump.md")).unwrap(),
            WIKI_DUMP
        );
    }

    #[test]
    fn test_init_config_points_at_local_files() {
        let dir = tempdir().unwrap();
        init(dir.path(), None).unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        let fcx_dir = Config::local_config_dir(dir.path());
        assert_eq!(config.exemplars.dir, Some(fcx_dir.join("exemplars")));
        assert_eq!(config.prompt.template, Some(fcx_dir.join("PROMPT.md")));

        let library = Library::load(&config.exemplars).unwrap();
        let entry = library.get("wiki_dump").unwrap();
        assert!(matches!(entry.origin, Origin::File(_)));
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let fcx_dir = dir.path().join(".fcx");
        fs::create_dir_all(&fcx_dir).unwrap();

        // Should not error, just warn
        init(dir.path(), None).unwrap();
        assert!(!fcx_dir.join("fcx.yml").exists());
    }
}
