use std::path::PathBuf;

use cargo_bridge_core::api::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "cargo-bridge", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory inside the project; the nearest `Cargo.toml` above it
    /// marks the project root.
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Output rendering: `text` or `jsonl`. Overrides the config file.
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Plain ASCII markers instead of symbols.
    #[arg(long, default_value_t = false, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    Build,
    Clean,
    /// Cargo has no configure step; reports a failed job.
    Configure,
    Install(InstallArgs),
    Run(RunArgs),
    /// Any other cargo subcommand, e.g. `custom test -- --nocapture`.
    Custom(CustomArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InstallArgs {
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Binary target; falls back to `launch.identifier` from the config.
    #[arg(long)]
    pub bin: Option<String>,

    /// Passed to the program after `--`.
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CustomArgs {
    pub command: String,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
