//! Command-line interface definitions.
//!
//! Every flag is optional: a bare `sitepack` builds with `sitepack.toml`
//! (or the built-in defaults when no config file exists).

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Static asset build pipeline CLI
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitepack.toml)
    #[arg(short = 'C', long, default_value = "sitepack.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Source directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Output directory path (relative to project root), recreated on every run
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Minify JavaScript, HTML and CSS
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Rename JavaScript files to hashed names and rewrite HTML references
    #[arg(short = 'O', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub obfuscate: Option<bool>,

    /// Allow the built scripts to run on this domain (repeatable, enables the domain lock)
    #[arg(short, long = "domain", value_name = "HOST")]
    pub domains: Vec<String>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
