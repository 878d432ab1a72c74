use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "CellStack CLI - ranks the battery-cell stacking configurations that fit a given envelope and thickness window.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads used to scan sources.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan cell catalogs and write the top-K stacking configurations.
    Generate(GenerateArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    // --- Sources ---
    /// Cell catalog files (CSV). Empty entries are ignored.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// File listing one catalog path per line; blank lines are ignored.
    #[arg(long, value_name = "PATH")]
    pub source_list: Option<PathBuf>,

    // --- Output ---
    /// Path for the ranked result file. Without it the ranking is only printed.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Constraint Overrides ---
    /// Maximum envelope width.
    #[arg(long, value_name = "INT")]
    pub max_width: Option<u32>,

    /// Maximum envelope length.
    #[arg(long, value_name = "INT")]
    pub max_length: Option<u32>,

    /// Lower bound of the accepted cell thickness (inclusive).
    #[arg(long, value_name = "INT")]
    pub from_thickness: Option<u32>,

    /// Upper bound of the accepted cell thickness (inclusive).
    #[arg(long, value_name = "INT")]
    pub to_thickness: Option<u32>,

    /// Number of configurations to keep.
    #[arg(short = 'k', long, value_name = "INT")]
    pub top_k: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Repeat the flag for several values. Example: -S envelope.max-width=120
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}
