//! Command-line interface definitions for pie-plot.

use clap::{Parser, Subcommand, ValueEnum};

/// Default location of the JMH result file, relative to the working directory.
pub const DEFAULT_INPUT: &str = "build/reports/jmh/result.json";

/// PIE benchmark result plotter data tool.
#[derive(Parser)]
#[command(name = "pie-plot", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Input JMH result file (JSON).
    #[arg(long, short = 'i', global = true, default_value = DEFAULT_INPUT)]
    pub input_file: String,

    /// Plot configuration file (TOML).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Suppress progress output; show only errors and requested data.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output with timings.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the long-form table.
    Table,
    /// Export the long-form table.
    Export(ExportArgs),
    /// Print the data of each configured chart.
    Charts(ChartsArgs),
}

/// Export formats.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array of row objects.
    Json,
}

impl ExportFormat {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Arguments for the `export` subcommand.
#[derive(Parser)]
pub struct ExportArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file path, or `-` for stdout (default: build/reports/jmh/result.<format>).
    #[arg(short = 'o', long)]
    pub output: Option<String>,
}

/// Arguments for the `charts` subcommand.
#[derive(Parser)]
pub struct ChartsArgs {
    /// Only print charts whose title contains this substring.
    #[arg(long)]
    pub chart: Option<String>,
}
