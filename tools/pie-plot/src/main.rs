//! PIE benchmark result tool.
//!
//! Reads a JMH JSON result file, normalizes it into a long-form table and
//! prints it, exports it, or prints the data behind each comparison chart.
//!
//! Pipeline: load config → read result JSON → assemble table → subcommand.

mod cli;
mod verbose;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use pie_bench_data::{Assembler, LongFormTable, PlotConfig, chart, export};
use serde_json::Value;

use verbose::{Stage, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let table = load_table(Path::new(&cli.input_file), &config)?;

    match cli.command {
        cli::Command::Table => cmd_table(&table),
        cli::Command::Export(ref args) => cmd_export(&table, args),
        cli::Command::Charts(ref args) => cmd_charts(&table, &config, args),
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load the plot configuration, or the built-in defaults if no file is given.
fn load_config(path: Option<&str>) -> Result<PlotConfig> {
    let Some(path) = path else {
        vprintln!("No configuration file, using defaults");
        return Ok(PlotConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    let config = PlotConfig::from_toml(&text).with_context(|| format!("loading config {path}"))?;
    vprintln!("Loaded config {path} ({} charts)", config.charts.len());
    Ok(config)
}

/// Read and normalize the JMH result file.
fn load_table(path: &Path, config: &PlotConfig) -> Result<LongFormTable> {
    dprintln!("Loading {}...", path.display());

    let stage = Stage::start("read");
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    stage.done(text.len(), "bytes");

    let stage = Stage::start("decode");
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("decoding JSON in {}", path.display()))?;
    stage.done(document.as_array().map_or(0, Vec::len), "records");

    let stage = Stage::start("assemble");
    let table = Assembler::new(&config.benchmark)
        .assemble_document(&document)
        .with_context(|| format!("normalizing benchmark records in {}", path.display()))?;
    stage.done(table.len(), "rows");

    dprintln!(
        "  {} observations, {} benchmarks, {} dimension columns",
        table.len(),
        table.distinct("benchmark").len(),
        table.dimensions().len()
    );
    for name in table.dimensions() {
        vprintln!(
            "  {}: {}",
            config.dimension_label(name),
            table.distinct(name).join(", ")
        );
    }

    Ok(table)
}

// ===========================================================================
// Subcommands
// ===========================================================================

/// `pie-plot table`: print the long-form table.
fn cmd_table(table: &LongFormTable) -> Result<()> {
    export::write_table(table, io::stdout().lock()).context("writing table to stdout")
}

/// `pie-plot export`: write the table as CSV or JSON.
fn cmd_export(table: &LongFormTable, args: &cli::ExportArgs) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => PathBuf::from(cli::DEFAULT_INPUT)
            .with_extension(args.format.extension())
            .to_string_lossy()
            .into_owned(),
    };

    let mut writer: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout().lock())
    } else {
        let path = Path::new(&output);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Box::new(BufWriter::new(file))
    };

    match args.format {
        cli::ExportFormat::Csv => export::write_csv(table, &mut writer)
            .with_context(|| format!("writing CSV to {output}"))?,
        cli::ExportFormat::Json => {
            export::write_json(table, &mut writer)
                .with_context(|| format!("writing JSON to {output}"))?;
            writeln!(writer)?;
        }
    }
    writer
        .flush()
        .with_context(|| format!("flushing {output}"))?;

    if output != "-" {
        dprintln!("  {} rows written to {output}", table.len());
    }
    Ok(())
}

/// `pie-plot charts`: print the data of each configured chart.
fn cmd_charts(table: &LongFormTable, config: &PlotConfig, args: &cli::ChartsArgs) -> Result<()> {
    let specs = config.chart_specs()?;
    let charts: Vec<_> = chart::slice_all(table, &specs)
        .into_iter()
        .filter(|c| args.chart.as_deref().is_none_or(|f| c.title.contains(f)))
        .collect();

    if charts.is_empty() {
        match &args.chart {
            Some(filter) => bail!("no chart title contains '{filter}'"),
            None => bail!("no charts configured"),
        }
    }

    let mut out = io::stdout().lock();
    for (i, c) in charts.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        export::write_chart_summary(c, &mut out).context("writing chart to stdout")?;
    }
    Ok(())
}
