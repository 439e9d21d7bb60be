//! CLI argument definitions for the cohort cleansing tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cohort-cleanse",
    version,
    about = "Clean and link subject registry and assessment datasets",
    long_about = "Clean a subject registry and its repeated self-reported assessments.\n\n\
                  Validates field ranges, propagates registry exclusions into the\n\
                  assessment set, checks diagnostic-result progression per subject,\n\
                  and merges each subject's same-day assessments into one row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean both datasets and write the retained rows.
    Clean(CleanArgs),

    /// Print the expected input schema, ranges, and vocabularies.
    Fields,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Subject registry CSV file.
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// Assessment CSV file.
    #[arg(value_name = "ASSESSMENTS")]
    pub assessments: PathBuf,

    /// Output directory (default: the registry file's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Flag registry rows whose country code differs from this territory.
    #[arg(short = 't', long = "territory", value_name = "CODE")]
    pub territory: Option<String>,

    /// Drop subjects reporting fewer than two assessments.
    ///
    /// Subjects with no assessments, or a single one, carry no usable
    /// time series. Off by default: such subjects stay in the registry
    /// output unless this flag is set.
    #[arg(long = "require-repeat-assessments")]
    pub require_repeat_assessments: bool,

    /// Write a machine-readable JSON run report to this path.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Validate and summarize without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
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
