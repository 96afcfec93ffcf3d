//! Long-form normalization of PIE JMH benchmark results.
//!
//! JMH writes one record per (benchmark, parameter set) and multiplexes the
//! per-change counters of a run into `secondaryMetrics` keys of the form
//! `<change>:<metric>`. This crate decodes those records into a long-form
//! table with one row per (benchmark, parameters, change, metric), which is
//! what comparison charts and raw-data exports consume.
//!
//! Pipeline: decoded JSON records → [`RecordParser`] (per record, validated
//! before any row is produced) → [`Assembler`] (ordered concatenation plus
//! dimension schema) → [`LongFormTable`] → [`chart::slice`] / [`export`].
//!
//! # Usage
//!
//! ```ignore
//! use pie_bench_data::{Assembler, BenchmarkNaming};
//!
//! let document: serde_json::Value = serde_json::from_str(&text)?;
//! let naming = BenchmarkNaming::default();
//! let table = Assembler::new(&naming).assemble_document(&document)?;
//! for row in table.rows() {
//!     println!("{} {} {}={}", row.benchmark, row.change, row.variable, row.value);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod key;
pub mod labels;
pub mod naming;
pub mod parser;
pub mod record;
pub mod table;

pub use chart::{Chart, ChartSpec, Facet, FacetAxis, Point, Series};
pub use config::{ChartConfig, ConfigError, PlotConfig};
pub use error::{ParseError, ParseErrorKind};
pub use key::CompoundKey;
pub use labels::Labels;
pub use naming::BenchmarkNaming;
pub use parser::{Observations, ParsedRecord, RecordParser};
pub use record::{Dimensions, MetricValue, Observation};
pub use table::{Assembler, LongFormTable, RowFilter, assemble};
