//! Chart data: long-form rows sliced into facets and per-benchmark series.
//!
//! Each [`ChartSpec`] selects a subset of the table (metrics plus dimension
//! filters) and splits it along one facet axis. The resulting [`Chart`] is
//! everything a renderer needs: one facet per sub-plot, one series per
//! benchmark, one point per change.

use std::fmt;
use std::str::FromStr;

use crate::labels::Labels;
use crate::record::Observation;
use crate::table::{LongFormTable, RowFilter};

/// Axis along which a chart is split into sub-plots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetAxis {
    /// One facet per metric.
    Variable,
    /// One facet per value of the named dimension.
    Dimension(String),
}

impl FacetAxis {
    fn key<'a>(&self, row: &'a Observation) -> Option<&'a str> {
        match self {
            Self::Variable => Some(row.variable.as_str()),
            Self::Dimension(name) => row.dimension(name),
        }
    }
}

impl FromStr for FacetAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "variable" {
            return Ok(Self::Variable);
        }
        match s.strip_prefix("dimension:") {
            Some(name) if !name.is_empty() => Ok(Self::Dimension(name.to_owned())),
            _ => Err(format!(
                "invalid facet '{s}' (expected 'variable' or 'dimension:<name>')"
            )),
        }
    }
}

impl fmt::Display for FacetAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Dimension(name) => write!(f, "dimension:{name}"),
        }
    }
}

/// Definition of one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    /// Title template; `{name}` is replaced by the filter value of dimension `name`.
    pub title: String,
    /// Metrics to include, with display labels, in facet order.
    pub metrics: Labels,
    /// Required dimension values.
    pub filters: Vec<(String, String)>,
    /// Facet axis.
    pub facet: FacetAxis,
    /// Labels and order for dimension facet values.
    pub facet_labels: Labels,
}

/// Metrics compared by the incrementality charts.
pub const INCREMENTALITY_METRICS: [(&str, &str); 5] = [
    ("systemNanoTime", "Time"),
    ("requiredTasks", "Required tasks"),
    ("executedTasks", "Executed tasks"),
    ("requiredResourceDependencies", "Required resource dependencies"),
    ("providedResourceDependencies", "Provided resource dependencies"),
];

impl ChartSpec {
    /// Compare every incrementality metric across changes for one language
    /// and layer, one facet per metric.
    pub fn incrementality(language: &str, layer: &str) -> Self {
        Self {
            title: "Incrementality comparison (language={language}, layer={layer})".into(),
            metrics: INCREMENTALITY_METRICS.into_iter().collect(),
            filters: vec![
                ("language".into(), language.into()),
                ("layer".into(), layer.into()),
            ],
            facet: FacetAxis::Variable,
            facet_labels: Labels::new(),
        }
    }

    /// Compare time across processing layers for one language, one facet per layer.
    pub fn layer(language: &str) -> Self {
        Self {
            title: "Layer comparison (language={language})".into(),
            metrics: Labels::new().with("systemNanoTime", "Time"),
            filters: vec![("language".into(), language.into())],
            facet: FacetAxis::Dimension("layer".into()),
            facet_labels: Labels::new()
                .with("validation", "Validation")
                .with("noop", "None"),
        }
    }

    /// The standard chart set for the Spoofax 3 benchmarks.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::incrementality("calc", "validation"),
            Self::incrementality("chars", "validation"),
            Self::layer("calc"),
            Self::layer("chars"),
        ]
    }

    /// Title with `{dimension}` placeholders filled from the filters.
    pub fn resolved_title(&self) -> String {
        self.filters
            .iter()
            .fold(self.title.clone(), |title, (name, value)| {
                title.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Row filter selecting the chart's metrics and dimension values.
    pub fn row_filter(&self) -> RowFilter {
        self.filters.iter().fold(
            RowFilter::new().variable_in(self.metrics.keys()),
            |filter, (name, value)| filter.dimension_eq(name.as_str(), value.as_str()),
        )
    }

    fn facet_label<'a>(&'a self, key: &'a str) -> &'a str {
        match self.facet {
            FacetAxis::Variable => self.metrics.label(key),
            FacetAxis::Dimension(_) => self.facet_labels.label(key),
        }
    }

    fn facet_order(&self) -> &Labels {
        match self.facet {
            FacetAxis::Variable => &self.metrics,
            FacetAxis::Dimension(_) => &self.facet_labels,
        }
    }
}

/// Data of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Resolved title.
    pub title: String,
    /// Non-empty facets in display order.
    pub facets: Vec<Facet>,
}

impl Chart {
    /// Returns `true` if no row matched the chart.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

/// One sub-plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Metric name or dimension value selecting this facet.
    pub key: String,
    /// Display label of the facet.
    pub label: String,
    /// One series per benchmark, in first-seen order.
    pub series: Vec<Series>,
}

/// The points of one benchmark within a facet.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Benchmark display name.
    pub benchmark: String,
    /// Points in table order.
    pub points: Vec<Point>,
}

/// One bar: a change and its measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Change identifier.
    pub change: String,
    /// Score.
    pub value: f64,
    /// Score error.
    pub error: f64,
    /// Score unit.
    pub unit: String,
}

/// Slice `table` according to `spec`.
///
/// Facets follow the listing order of the spec's metrics (variable axis) or
/// facet labels (dimension axis); values not listed there follow in
/// first-seen order. Rows lacking the facet dimension are left out.
pub fn slice(table: &LongFormTable, spec: &ChartSpec) -> Chart {
    let filter = spec.row_filter();
    let mut facets: Vec<Facet> = Vec::new();

    for row in table.rows_where(&filter) {
        let Some(key) = spec.facet.key(row) else {
            continue;
        };
        let facet_index = match facets.iter().position(|f| f.key == key) {
            Some(i) => i,
            None => {
                facets.push(Facet {
                    key: key.to_owned(),
                    label: spec.facet_label(key).to_owned(),
                    series: Vec::new(),
                });
                facets.len() - 1
            }
        };
        let facet = &mut facets[facet_index];
        let series_index = match facet.series.iter().position(|s| s.benchmark == row.benchmark) {
            Some(i) => i,
            None => {
                facet.series.push(Series {
                    benchmark: row.benchmark.clone(),
                    points: Vec::new(),
                });
                facet.series.len() - 1
            }
        };
        let series = &mut facet.series[series_index];
        series.points.push(Point {
            change: row.change.clone(),
            value: row.value,
            error: row.error,
            unit: row.unit.clone(),
        });
    }

    // Stable sort: listed keys by listing position, unlisted keys after, in first-seen order.
    let order = spec.facet_order();
    facets.sort_by_key(|f| order.position(&f.key).unwrap_or(usize::MAX));

    Chart {
        title: spec.resolved_title(),
        facets,
    }
}

/// Slice `table` for every spec in `specs`.
pub fn slice_all(table: &LongFormTable, specs: &[ChartSpec]) -> Vec<Chart> {
    specs.iter().map(|spec| slice(table, spec)).collect()
}
