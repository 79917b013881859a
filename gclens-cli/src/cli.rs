//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// gclens -- JVM garbage collection log parser.
///
/// Use `gclens <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "gclens", version, about, long_about = None)]
pub struct Cli {
    /// Path to the gclens.toml configuration file.
    #[arg(short, long, default_value = "gclens.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format for diagnostics written to stderr.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Diagnostic log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse GC log files and summarize the events found.
    Parse(ParseArgs),

    /// Print the canonical lines produced by the preprocessor.
    Preprocess(PreprocessArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- parse ----

/// Parse one or more GC log files. Files are processed concurrently.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// GC log files to parse.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// JVM start time for logs carrying only datestamps (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS).
    #[arg(long)]
    pub reference_date: Option<String>,

    /// JVM options, overriding the log's `CommandLine flags:` header.
    #[arg(long)]
    pub vm_options: Option<String>,

    /// Also list every line that matched no event grammar.
    #[arg(long)]
    pub show_unidentified: bool,
}

// ---- preprocess ----

/// Run only the preprocessing stage on a single file.
#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// GC log file.
    pub file: PathBuf,

    /// JVM start time for logs carrying only datestamps.
    #[arg(long)]
    pub reference_date: Option<String>,
}

// ---- config ----

/// Manage gclens configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parser).
        #[arg(long)]
        section: Option<String>,
    },
}
