//! Decoding of single JMH result records into long-form rows.
//!
//! A record is validated completely before any of its rows are produced:
//! either every compound-keyed metric of the record is well formed and the
//! record yields one row per such metric, or the record is rejected with a
//! [`ParseError`] naming the offending field.
//!
//! Every `params` key of a record is a dimension column of the table, even
//! when its value is `null`. A `null` parameter leaves the dimension absent
//! on that record's rows. A parameter named like a fixed column (`change`,
//! `benchmark`, `variable`, `value`, `error`, `unit`) is rejected.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::key::CompoundKey;
use crate::naming::BenchmarkNaming;
use crate::record::{Dimensions, MetricValue, Observation};
use crate::table::{LEADING_COLUMNS, TRAILING_COLUMNS};

/// Field holding the fully qualified benchmark method.
pub const BENCHMARK_FIELD: &str = "benchmark";
/// Field holding the JMH `@Param` values.
pub const PARAMS_FIELD: &str = "params";
/// Field holding the multiplexed per-change metrics.
pub const SECONDARY_METRICS_FIELD: &str = "secondaryMetrics";

const SCORE_FIELD: &str = "score";
const SCORE_ERROR_FIELD: &str = "scoreError";
const SCORE_UNIT_FIELD: &str = "scoreUnit";

/// Decodes records using a benchmark naming rule.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'n> {
    naming: &'n BenchmarkNaming,
}

impl<'n> RecordParser<'n> {
    /// Create a parser that shortens benchmark names with `naming`.
    pub fn new(naming: &'n BenchmarkNaming) -> Self {
        Self { naming }
    }

    /// Validate record number `index` and prepare its rows.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the record is not an object, lacks
    /// `benchmark` or `secondaryMetrics`, or if a compound-keyed metric value
    /// lacks `score`, `scoreError` or `scoreUnit`. Metrics whose key has no
    /// `:` are skipped without being inspected.
    pub fn parse<'r>(&self, index: usize, record: &'r Value) -> Result<ParsedRecord<'r>, ParseError> {
        let object = record
            .as_object()
            .ok_or_else(|| ParseError::not_an_object(index))?;

        let benchmark = object
            .get(BENCHMARK_FIELD)
            .ok_or_else(|| ParseError::missing_field(index, BENCHMARK_FIELD))?
            .as_str()
            .ok_or_else(|| ParseError::invalid_type(index, BENCHMARK_FIELD, "string"))?;

        let (columns, dimensions) = match object.get(PARAMS_FIELD) {
            None | Some(Value::Null) => (Vec::new(), Dimensions::new()),
            Some(Value::Object(params)) => parse_params(index, params)?,
            Some(_) => return Err(ParseError::invalid_type(index, PARAMS_FIELD, "object")),
        };

        let secondary = object
            .get(SECONDARY_METRICS_FIELD)
            .ok_or_else(|| ParseError::missing_field(index, SECONDARY_METRICS_FIELD))?
            .as_object()
            .ok_or_else(|| ParseError::invalid_type(index, SECONDARY_METRICS_FIELD, "object"))?;

        let mut metrics = Vec::with_capacity(secondary.len());
        for (name, value) in secondary {
            let Some(key) = CompoundKey::decode(name) else {
                continue;
            };
            metrics.push((key, parse_metric_value(index, name, value)?));
        }

        Ok(ParsedRecord {
            benchmark: self.naming.display_name(benchmark).to_owned(),
            columns,
            dimensions,
            metrics,
        })
    }
}

/// A validated record, ready to be turned into rows.
#[derive(Debug, Clone)]
pub struct ParsedRecord<'r> {
    benchmark: String,
    columns: Vec<String>,
    dimensions: Dimensions,
    metrics: Vec<(CompoundKey<'r>, MetricValue)>,
}

impl<'r> ParsedRecord<'r> {
    /// Benchmark display name.
    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// Dimension values of the record.
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Every `params` key of the record, including `null`-valued ones.
    pub fn dimension_columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows the record will produce.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` if the record has no compound-keyed metrics.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Consume the record, producing its rows lazily in key order.
    pub fn into_observations(self) -> Observations<'r> {
        Observations {
            benchmark: self.benchmark,
            dimensions: self.dimensions,
            metrics: self.metrics.into_iter(),
        }
    }
}

/// Lazy sequence of the rows of one record.
#[derive(Debug)]
pub struct Observations<'r> {
    benchmark: String,
    dimensions: Dimensions,
    metrics: std::vec::IntoIter<(CompoundKey<'r>, MetricValue)>,
}

impl Iterator for Observations<'_> {
    type Item = Observation;

    fn next(&mut self) -> Option<Observation> {
        let (key, value) = self.metrics.next()?;
        Some(Observation {
            change: key.change.to_owned(),
            benchmark: self.benchmark.clone(),
            dimensions: self.dimensions.clone(),
            variable: key.metric.to_owned(),
            value: value.score,
            error: value.error,
            unit: value.unit,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.metrics.size_hint()
    }
}

impl ExactSizeIterator for Observations<'_> {}

fn parse_params(
    index: usize,
    params: &Map<String, Value>,
) -> Result<(Vec<String>, Dimensions), ParseError> {
    let mut columns = Vec::with_capacity(params.len());
    let mut dimensions = Dimensions::new();
    for (name, value) in params {
        let field = || format!("{PARAMS_FIELD}.{name}");
        if LEADING_COLUMNS.contains(&name.as_str()) || TRAILING_COLUMNS.contains(&name.as_str()) {
            return Err(ParseError::reserved_name(index, field()));
        }
        columns.push(name.clone());
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(ParseError::invalid_type(index, field(), "string"));
            }
        };
        dimensions.insert(name.as_str(), value);
    }
    Ok((columns, dimensions))
}

fn parse_metric_value(index: usize, key: &str, value: &Value) -> Result<MetricValue, ParseError> {
    let path = format!("{SECONDARY_METRICS_FIELD}.{key}");
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::invalid_type(index, path.as_str(), "object"))?;

    let field = |name: &str| {
        object
            .get(name)
            .ok_or_else(|| ParseError::missing_field(index, format!("{path}.{name}")))
    };

    let score = field(SCORE_FIELD)?;
    let score = parse_number(score).ok_or_else(|| {
        ParseError::invalid_type(index, format!("{path}.{SCORE_FIELD}"), "number")
    })?;
    let error = field(SCORE_ERROR_FIELD)?;
    let error = parse_number(error).ok_or_else(|| {
        ParseError::invalid_type(index, format!("{path}.{SCORE_ERROR_FIELD}"), "number")
    })?;
    let unit = field(SCORE_UNIT_FIELD)?.as_str().ok_or_else(|| {
        ParseError::invalid_type(index, format!("{path}.{SCORE_UNIT_FIELD}"), "string")
    })?;

    Ok(MetricValue {
        score,
        error,
        unit: unit.to_owned(),
    })
}

/// JSON numbers, plus the non-finite spellings JMH emits as strings.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" | "+Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use serde_json::json;

    fn parse_all(record: &Value) -> Result<Vec<Observation>, ParseError> {
        let naming = BenchmarkNaming::default();
        let parsed = RecordParser::new(&naming).parse(0, record)?;
        Ok(parsed.into_observations().collect())
    }

    fn metric(score: f64) -> Value {
        json!({ "score": score, "scoreError": 0.0, "scoreUnit": "ms" })
    }

    #[test]
    fn decodes_example_record() {
        let record = json!({
            "benchmark": "pkg.Bench.foo",
            "params": { "layer": "validation" },
            "secondaryMetrics": {
                "c1:systemNanoTime": { "score": 1.5, "scoreError": 0.1, "scoreUnit": "s" },
                "noSeparator": { "score": 9 }
            }
        });
        let rows = parse_all(&record).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.change, "c1");
        assert_eq!(row.benchmark, "foo");
        assert_eq!(row.dimension("layer"), Some("validation"));
        assert_eq!(row.variable, "systemNanoTime");
        assert_eq!(row.value, 1.5);
        assert_eq!(row.error, 0.1);
        assert_eq!(row.unit, "s");
    }

    #[test]
    fn rows_follow_key_order() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": {
                "z:time": metric(1.0),
                "a:time": metric(2.0),
                "m:tasks": metric(3.0)
            }
        });
        let rows = parse_all(&record).unwrap();
        let keys: Vec<_> = rows
            .iter()
            .map(|r| format!("{}:{}", r.change, r.variable))
            .collect();
        assert_eq!(keys, ["z:time", "a:time", "m:tasks"]);
    }

    #[test]
    fn missing_params_gives_no_dimensions() {
        let record = json!({ "benchmark": "b", "secondaryMetrics": { "c:t": metric(1.0) } });
        let rows = parse_all(&record).unwrap();
        assert!(rows[0].dimensions.is_empty());
    }

    #[test]
    fn scalar_params_are_rendered_as_text() {
        let record = json!({
            "benchmark": "b",
            "params": { "threads": 4, "warm": true, "skip": null },
            "secondaryMetrics": { "c:t": metric(1.0) }
        });
        let rows = parse_all(&record).unwrap();
        assert_eq!(rows[0].dimension("threads"), Some("4"));
        assert_eq!(rows[0].dimension("warm"), Some("true"));
        assert_eq!(rows[0].dimension("skip"), None);
    }

    #[test]
    fn nan_score_error_is_accepted() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": {
                "c:t": { "score": 2.0, "scoreError": "NaN", "scoreUnit": "ms" }
            }
        });
        let rows = parse_all(&record).unwrap();
        assert!(rows[0].error.is_nan());
    }

    #[test]
    fn missing_secondary_metrics_is_an_error() {
        let err = parse_all(&json!({ "benchmark": "b" })).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingField);
        assert_eq!(err.field(), Some("secondaryMetrics"));
        assert_eq!(err.record(), Some(0));
    }

    #[test]
    fn missing_benchmark_is_an_error() {
        let err = parse_all(&json!({ "secondaryMetrics": {} })).unwrap_err();
        assert_eq!(err.field(), Some("benchmark"));
    }

    #[test]
    fn missing_score_names_the_metric() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": {
                "c1:time": metric(1.0),
                "c2:time": { "scoreError": 0.0, "scoreUnit": "ms" }
            }
        });
        let err = parse_all(&record).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingField);
        assert_eq!(err.field(), Some("secondaryMetrics.c2:time.score"));
    }

    #[test]
    fn wrong_unit_type_is_an_error() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": { "c:t": { "score": 1, "scoreError": 0, "scoreUnit": 3 } }
        });
        let err = parse_all(&record).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidType { expected: "string" });
    }

    #[test]
    fn non_object_record_is_an_error() {
        let err = parse_all(&json!("benchmark")).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::NotAnObject);
    }

    #[test]
    fn infinite_spellings_are_accepted() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": {
                "c:t": { "score": "Infinity", "scoreError": "-Infinity", "scoreUnit": "ms" }
            }
        });
        let rows = parse_all(&record).unwrap();
        assert_eq!(rows[0].value, f64::INFINITY);
        assert_eq!(rows[0].error, f64::NEG_INFINITY);
    }

    #[test]
    fn non_numeric_score_string_is_an_error() {
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": {
                "c:t": { "score": "abc", "scoreError": 0.0, "scoreUnit": "ms" }
            }
        });
        let err = parse_all(&record).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidType { expected: "number" });
        assert_eq!(err.field(), Some("secondaryMetrics.c:t.score"));
    }

    #[test]
    fn param_named_like_fixed_column_is_an_error() {
        let record = json!({
            "benchmark": "b",
            "params": { "language": "calc", "value": "V" },
            "secondaryMetrics": { "c:t": metric(1.0) }
        });
        let err = parse_all(&record).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::ReservedName);
        assert_eq!(err.field(), Some("params.value"));
    }

    #[test]
    fn null_param_is_a_column_without_a_value() {
        let naming = BenchmarkNaming::default();
        let record = json!({
            "benchmark": "b",
            "params": { "store": null, "layer": "noop" },
            "secondaryMetrics": { "c:t": metric(1.0) }
        });
        let parsed = RecordParser::new(&naming).parse(0, &record).unwrap();
        assert_eq!(parsed.dimension_columns(), ["store", "layer"]);
        assert_eq!(parsed.dimensions().get("store"), None);
    }

    #[test]
    fn nested_param_is_an_error() {
        let record = json!({
            "benchmark": "b",
            "params": { "layer": ["a"] },
            "secondaryMetrics": {}
        });
        let err = parse_all(&record).unwrap_err();
        assert_eq!(err.field(), Some("params.layer"));
    }

    #[test]
    fn observations_report_exact_size() {
        let naming = BenchmarkNaming::default();
        let record = json!({
            "benchmark": "b",
            "secondaryMetrics": { "a:t": metric(1.0), "b:t": metric(2.0), "gc": metric(0.0) }
        });
        let parsed = RecordParser::new(&naming).parse(0, &record).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.into_observations().len(), 2);
    }
}
