//! CLI argument definitions for interaction-query.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "interaction-query",
    version,
    about = "Query contact-center interaction exports with SQL",
    long_about = "Merge interaction CSV exports and query them with SQL.\n\n\
                  Files must share the first file's header to be merged.\n\
                  Participant attributes are available as ATTR('key')."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that every file's header matches the first file's.
    Validate(InputArgs),

    /// Load files and list columns and attribute keys.
    Schema(SchemaArgs),

    /// Load files and run one query.
    Query(QueryArgs),

    /// Load files and start an interactive shell.
    Shell(ShellArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// CSV files or folders containing CSV files. The first file sets the header.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only show names containing this text (case-insensitive).
    #[arg(long = "filter", value_name = "TEXT")]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// SQL to run (default: the configured default query).
    #[arg(long = "sql", value_name = "TEXT")]
    pub sql: Option<String>,

    /// Page of the result to show (1-based).
    #[arg(long = "page", value_name = "N", default_value_t = 1)]
    pub page: usize,

    #[command(flatten)]
    pub query: QueryOptions,

    /// How to print the result.
    #[arg(long = "output", value_enum, default_value = "table")]
    pub output: OutputArg,

    /// Also write the full result as CSV to this path.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShellArgs {
    /// CSV files or folders to load before the first prompt.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub query: QueryOptions,
}

/// Overrides for query settings.
#[derive(Args)]
pub struct QueryOptions {
    /// Rows per page.
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Name of the table queries run against.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,
}

/// Result output formats.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
