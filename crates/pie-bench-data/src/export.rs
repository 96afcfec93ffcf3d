//! Raw-data exports of the long-form table and chart data.
//!
//! All writers emit the columns in [`LongFormTable::columns`] order. Absent
//! dimensions become empty CSV cells, JSON `null`s and blank table cells.
//! Non-finite scores keep JMH's spellings: `NaN`, `Infinity`, `-Infinity`.

use std::io::{self, Write};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::chart::Chart;
use crate::record::Observation;
use crate::table::LongFormTable;

/// Write the table as CSV with a header row.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_csv<W: Write>(table: &LongFormTable, writer: W) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table {
        csv.write_record(cells(table, row))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the table as a pretty-printed JSON array of row objects.
///
/// # Errors
///
/// Returns any serialization or I/O error.
pub fn write_json<W: Write>(table: &LongFormTable, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &JsonTable(table))
}

/// Write the table as aligned text columns.
///
/// # Errors
///
/// Returns any I/O error.
pub fn write_table<W: Write>(table: &LongFormTable, mut out: W) -> io::Result<()> {
    if table.is_empty() {
        writeln!(out, "  No benchmark observations to display.")?;
        return Ok(());
    }

    let columns = table.columns();
    let rows: Vec<Vec<String>> = table.iter().map(|row| cells(table, row)).collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|cells| cells[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
        })
        .collect();
    // Numeric columns are right-aligned.
    let numeric = |i: usize| i + 3 >= columns.len() && i + 1 < columns.len();

    writeln!(out)?;
    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| pad(name, widths[i], numeric(i)))
        .collect();
    writeln!(out, "  {}", header.join("  ").trim_end())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "  {}", rule.join("  "))?;
    for cells in &rows {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], numeric(i)))
            .collect();
        writeln!(out, "  {}", line.join("  ").trim_end())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {} rows, {} benchmarks, {} changes",
        table.len(),
        table.distinct("benchmark").len(),
        table.distinct("change").len()
    )?;
    Ok(())
}

/// Write a text summary of a chart: one block per facet, one line per point.
///
/// # Errors
///
/// Returns any I/O error.
pub fn write_chart_summary<W: Write>(chart: &Chart, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", chart.title)?;
    if chart.is_empty() {
        writeln!(out, "  (no matching observations)")?;
        return Ok(());
    }
    for facet in &chart.facets {
        writeln!(out, "  {}", facet.label)?;
        let width = facet
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.change.chars().count())
            .max()
            .unwrap_or(0);
        for series in &facet.series {
            writeln!(out, "    {}", series.benchmark)?;
            for point in &series.points {
                writeln!(
                    out,
                    "      {:<width$}  {:>12.3} ± {:<10.3} {}",
                    point.change, point.value, point.error, point.unit
                )?;
            }
        }
    }
    Ok(())
}

fn cells(table: &LongFormTable, row: &Observation) -> Vec<String> {
    let mut cells = Vec::with_capacity(table.dimensions().len() + 6);
    cells.push(row.change.clone());
    cells.push(row.benchmark.clone());
    for name in table.dimensions() {
        cells.push(row.dimension(name).unwrap_or_default().to_owned());
    }
    cells.push(row.variable.clone());
    cells.push(number_text(row.value));
    cells.push(number_text(row.error));
    cells.push(row.unit.clone());
    cells
}

fn number_text(value: f64) -> String {
    match JsonNumber(value).spelling() {
        Some(spelling) => spelling.to_owned(),
        None => value.to_string(),
    }
}

fn pad(cell: &str, width: usize, right: bool) -> String {
    if right {
        format!("{cell:>width$}")
    } else {
        format!("{cell:<width$}")
    }
}

struct JsonTable<'a>(&'a LongFormTable);

/// A score that serializes as a JSON number when finite and as JMH's string
/// spelling otherwise.
struct JsonNumber(f64);

impl JsonNumber {
    fn spelling(&self) -> Option<&'static str> {
        if self.0.is_nan() {
            Some("NaN")
        } else if self.0 == f64::INFINITY {
            Some("Infinity")
        } else if self.0 == f64::NEG_INFINITY {
            Some("-Infinity")
        } else {
            None
        }
    }
}

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.spelling() {
            Some(spelling) => serializer.serialize_str(spelling),
            None => serializer.serialize_f64(self.0),
        }
    }
}

struct JsonRow<'a> {
    dimensions: &'a [String],
    row: &'a Observation,
}

impl Serialize for JsonTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0 {
            seq.serialize_element(&JsonRow {
                dimensions: self.0.dimensions(),
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.row;
        let mut map = serializer.serialize_map(Some(self.dimensions.len() + 6))?;
        map.serialize_entry("change", &row.change)?;
        map.serialize_entry("benchmark", &row.benchmark)?;
        for name in self.dimensions {
            map.serialize_entry(name, &row.dimension(name))?;
        }
        map.serialize_entry("variable", &row.variable)?;
        map.serialize_entry("value", &JsonNumber(row.value))?;
        map.serialize_entry("error", &JsonNumber(row.error))?;
        map.serialize_entry("unit", &row.unit)?;
        map.end()
    }
}
