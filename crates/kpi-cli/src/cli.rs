//! CLI argument definitions for the registry KPI reporter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "kpi-report",
    version,
    about = "HTA/DM registry KPIs - compute control indicators from registry exports",
    long_about = "Compute hypertension (HTA) and diabetes (DM) control indicators from a\n\
                  patient registry export, grouped by department, municipality and care\n\
                  provider, and joined with the expected population per group."
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

    /// Allow patient cell values in trace logs (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the KPI report for a registry export.
    Report(ReportArgs),

    /// List canonical registry and population columns with accepted spellings.
    Fields,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Registry export (delimited text; `;`, `,`, tab or `|`).
    #[arg(value_name = "REGISTRY_CSV")]
    pub registry: PathBuf,

    /// Population table with expected HTA/DM patients per group.
    #[arg(long = "population", value_name = "CSV")]
    pub population: PathBuf,

    /// Report year.
    #[arg(long = "year")]
    pub year: i32,

    /// Report month (1-12).
    #[arg(long = "month")]
    pub month: u32,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write the output to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Process rows in parallel shards of this many rows.
    #[arg(long = "shard-size", value_name = "ROWS")]
    pub shard_size: Option<usize>,

    /// Restrict the table summary to one department.
    #[arg(long = "department", value_name = "NAME")]
    pub department: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
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
