use crate::action::ToolRegistry;
use crate::cli::{CheckArgs, Cli};
use crate::config::Config;
use crate::exemplar::{Exemplar, ExemplarError};
use crate::library::Library;
use crate::templates::exemplars::BUILTIN;
use colored::*;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }
}

#[derive(Debug)]
pub struct CheckResult {
    pub label: String,
    pub findings: Vec<Finding>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.findings.iter().all(|f| f.severity != Severity::Error)
    }
}

type Target = (String, Result<Exemplar, ExemplarError>);

pub fn run(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let work_dir = Path::new(".");
    let config = Config::load(cli.config.as_ref(), work_dir)?;

    let targets = if args.paths.is_empty() {
        library_targets(&config)?
    } else {
        path_targets(&args.paths)?
    };

    let checker = ExemplarChecker::new(ToolRegistry::new(config.tools.clone()));
    let results = checker.check_all(targets)?;
    checker.print_results(&results);

    let failed = results.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        return Err(eyre::eyre!("{} of {} exemplars failed validation", failed, results.len()));
    }
    Ok(())
}

/// Built-ins (if enabled) plus the configured exemplar directory
fn library_targets(config: &Config) -> Result<Vec<Target>> {
    let mut targets: Vec<Target> = Vec::new();
    if config.exemplars.include_builtin {
        for (name, text) in BUILTIN {
            targets.push((format!("built-in:{}", name), Exemplar::parse(*name, text)));
        }
    }
    if let Some(dir) = &config.exemplars.dir {
        targets.extend(scan_targets(dir)?);
    }
    Ok(targets)
}

fn path_targets(paths: &[PathBuf]) -> Result<Vec<Target>> {
    let mut targets: Vec<Target> = Vec::new();
    for path in paths {
        if path.is_dir() {
            targets.extend(scan_targets(path)?);
        } else {
            targets.push((path.display().to_string(), Exemplar::load(path)));
        }
    }
    Ok(targets)
}

fn scan_targets(dir: &Path) -> Result<Vec<Target>> {
    Ok(Library::scan(dir)?
        .into_iter()
        .map(|(path, result)| (path.display().to_string(), result))
        .collect())
}

pub struct ExemplarChecker {
    registry: ToolRegistry,
}

impl ExemplarChecker {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Check every target, showing a progress bar for larger batches
    pub fn check_all(&self, targets: Vec<Target>) -> Result<Vec<CheckResult>> {
        let pb = if targets.len() > 1 {
            let pb = ProgressBar::new(targets.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} exemplars ({msg})")
                    .context("Invalid progress bar template")?
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut results = Vec::with_capacity(targets.len());
        for (label, parsed) in targets {
            pb.set_message(label.clone());
            results.push(self.check(label, parsed));
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(results)
    }

    pub fn check(&self, label: String, parsed: Result<Exemplar, ExemplarError>) -> CheckResult {
        let findings = match parsed {
            Ok(exemplar) => self.findings(&exemplar),
            Err(e) => {
                log::warn!("{}: {}", label, e);
                vec![Finding::error(e.to_string())]
            }
        };
        CheckResult { label, findings }
    }

    fn findings(&self, exemplar: &Exemplar) -> Vec<Finding> {
        let mut findings = Vec::new();

        for action in self.registry.unknown(&exemplar.actions) {
            findings.push(Finding::error(format!("Unknown tool in action {}", action)));
        }
        for action in exemplar.duplicate_actions() {
            findings.push(Finding::warning(format!("Duplicate action {}", action)));
        }
        for stray in &exemplar.stray_lines {
            findings.push(Finding::warning(format!(
                "Line {} in the action block is not a call: {}",
                stray.line,
                stray.text.trim()
            )));
        }

        findings
    }

    /// Print check results with colors
    pub fn print_results(&self, results: &[CheckResult]) {
        println!();
        println!("{}", "Exemplar Checks:".bold());
        for result in results {
            if result.passed() {
                println!("  {} {}", "✓".green(), result.label);
            } else {
                println!("  {} {}", "✗".red(), result.label);
            }
            for finding in &result.findings {
                match finding.severity {
                    Severity::Error => println!("    {}", finding.message.red()),
                    Severity::Warning => println!("    {} {}", "⚠".yellow(), finding.message.dimmed()),
                }
            }
        }
        println!();
        if results.iter().all(|r| r.passed()) {
            println!("{}", "All exemplars passed!".green().bold());
        } else {
            println!("{}", "Some exemplars failed.".red().bold());
        }
    }
}
