use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fcx",
    about = "Fact-check exemplar kit - validate, render and read claim verification exemplars",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/fcx/logs/fcx.log"
)]
pub struct Cli {
    /// Path to config file (overrides default locations)
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .fcx/ in current directory
    Init,

    /// List available exemplars
    List,

    /// Print an exemplar exactly as stored
    Show(ShowArgs),

    /// Validate exemplar files
    Check(CheckArgs),

    /// Render a few-shot prompt for a claim
    Render(RenderArgs),

    /// Extract actions from a model response
    Actions(ActionsArgs),
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Exemplar name
    pub name: String,

    /// Print the parsed exemplar as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Exemplar files to check (defaults to the configured library)
    pub paths: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Claim to verify
    #[arg(short = 'C', long, required = true)]
    pub claim: String,

    /// Exemplars to include (defaults to all, up to prompt.max_exemplars)
    #[arg(short, long = "exemplar")]
    pub exemplars: Vec<String>,
}

#[derive(Parser)]
pub struct ActionsArgs {
    /// Response file to read (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// File with previously issued actions, one per line
    #[arg(short, long)]
    pub past: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
