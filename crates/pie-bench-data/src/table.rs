//! Long-form table assembly.

use serde_json::Value;

use crate::error::ParseError;
use crate::naming::BenchmarkNaming;
use crate::parser::RecordParser;
use crate::record::Observation;

/// Names of the fixed columns preceding the dimension columns.
pub const LEADING_COLUMNS: [&str; 2] = ["change", "benchmark"];
/// Names of the fixed columns following the dimension columns.
pub const TRAILING_COLUMNS: [&str; 4] = ["variable", "value", "error", "unit"];

/// All observations of a run, in input order, plus the dimension schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongFormTable {
    rows: Vec<Observation>,
    dimensions: Vec<String>,
}

impl LongFormTable {
    /// Rows in input order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Dimension column names, in first-seen order.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Full column list: `change`, `benchmark`, the dimensions, then
    /// `variable`, `value`, `error`, `unit`.
    pub fn columns(&self) -> Vec<&str> {
        LEADING_COLUMNS
            .iter()
            .copied()
            .chain(self.dimensions.iter().map(String::as_str))
            .chain(TRAILING_COLUMNS.iter().copied())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.rows.iter()
    }

    /// Rows accepted by `filter`, in table order.
    pub fn rows_where<'a>(
        &'a self,
        filter: &'a RowFilter,
    ) -> impl Iterator<Item = &'a Observation> + 'a {
        self.rows.iter().filter(move |row| filter.matches(row))
    }

    /// Distinct values of a string column (fixed or dimension), in
    /// first-seen order. Rows lacking the column are skipped.
    pub fn distinct(&self, column: &str) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for value in self.rows.iter().filter_map(|row| row.column(column)) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }
}

impl<'a> IntoIterator for &'a LongFormTable {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Row predicate over `variable` and dimension values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    variables: Option<Vec<String>>,
    dimensions: Vec<(String, String)>,
}

impl RowFilter {
    /// A filter accepting every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept rows whose `variable` is one of `variables`.
    #[must_use]
    pub fn variable_in<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    /// Only accept rows carrying dimension `name` with value `value`.
    #[must_use]
    pub fn dimension_eq(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }

    /// Returns `true` if `row` passes every condition.
    pub fn matches(&self, row: &Observation) -> bool {
        if let Some(variables) = &self.variables {
            if !variables.iter().any(|v| *v == row.variable) {
                return false;
            }
        }
        self.dimensions
            .iter()
            .all(|(name, value)| row.dimension(name) == Some(value.as_str()))
    }
}

/// Runs the record parser over a sequence of records and collects the rows.
///
/// Assembly is all-or-nothing: the first malformed record aborts it and no
/// table is returned.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'n> {
    parser: RecordParser<'n>,
}

impl<'n> Assembler<'n> {
    /// Create an assembler shortening benchmark names with `naming`.
    pub fn new(naming: &'n BenchmarkNaming) -> Self {
        Self {
            parser: RecordParser::new(naming),
        }
    }

    /// Assemble a table from already-decoded records.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the first malformed record.
    pub fn assemble(&self, records: &[Value]) -> Result<LongFormTable, ParseError> {
        let mut builder = TableBuilder::default();
        for (index, record) in records.iter().enumerate() {
            builder.push(&self.parser, index, record)?;
        }
        Ok(builder.finish())
    }

    /// Assemble a table from a whole result document, which must be a JSON
    /// array of records.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the document is not an array or if any
    /// record is malformed.
    pub fn assemble_document(&self, document: &Value) -> Result<LongFormTable, ParseError> {
        let records = document.as_array().ok_or_else(ParseError::not_a_sequence)?;
        self.assemble(records)
    }

    /// Assemble a table from records produced one at a time, holding only
    /// the current record in its raw form.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the first malformed record; rows already
    /// decoded are discarded.
    pub fn assemble_iter<I>(&self, records: I) -> Result<LongFormTable, ParseError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut builder = TableBuilder::default();
        for (index, record) in records.into_iter().enumerate() {
            builder.push(&self.parser, index, &record)?;
        }
        Ok(builder.finish())
    }
}

/// Assemble a table with the default benchmark naming rule.
///
/// # Errors
///
/// Returns the [`ParseError`] of the first malformed record.
pub fn assemble(records: &[Value]) -> Result<LongFormTable, ParseError> {
    Assembler::new(&BenchmarkNaming::default()).assemble(records)
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Observation>,
    dimensions: Vec<String>,
}

impl TableBuilder {
    fn push(&mut self, parser: &RecordParser<'_>, index: usize, record: &Value) -> Result<(), ParseError> {
        let parsed = parser.parse(index, record)?;
        for name in parsed.dimension_columns() {
            if !self.dimensions.contains(name) {
                self.dimensions.push(name.clone());
            }
        }
        self.rows.extend(parsed.into_observations());
        Ok(())
    }

    fn finish(self) -> LongFormTable {
        LongFormTable {
            rows: self.rows,
            dimensions: self.dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric(score: f64) -> Value {
        json!({ "score": score, "scoreError": 0.25, "scoreUnit": "s" })
    }

    fn records() -> Vec<Value> {
        vec![
            json!({
                "benchmark": "mb.Bench.full",
                "params": { "language": "calc", "layer": "validation" },
                "secondaryMetrics": {
                    "c1:systemNanoTime": metric(1.0),
                    "c1:executedTasks": metric(10.0),
                    "·gc.alloc.rate": metric(5.0)
                }
            }),
            json!({
                "benchmark": "mb.Bench.incr",
                "params": { "language": "chars", "store": "lmdb" },
                "secondaryMetrics": { "c2:systemNanoTime": metric(2.0) }
            }),
        ]
    }

    #[test]
    fn concatenates_in_record_order() {
        let table = assemble(&records()).unwrap();
        let keys: Vec<_> = table
            .iter()
            .map(|r| (r.benchmark.as_str(), r.change.as_str(), r.variable.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("full", "c1", "systemNanoTime"),
                ("full", "c1", "executedTasks"),
                ("incr", "c2", "systemNanoTime"),
            ]
        );
    }

    #[test]
    fn dimension_schema_is_union_in_first_seen_order() {
        let table = assemble(&records()).unwrap();
        assert_eq!(table.dimensions(), ["language", "layer", "store"]);
        assert_eq!(
            table.columns(),
            ["change", "benchmark", "language", "layer", "store", "variable", "value", "error", "unit"]
        );
        assert_eq!(table.rows()[0].dimension("store"), None);
        assert_eq!(table.rows()[2].dimension("layer"), None);
        assert_eq!(table.rows()[2].dimension("store"), Some("lmdb"));
    }

    #[test]
    fn malformed_record_aborts_assembly() {
        let mut input = records();
        input.push(json!({ "benchmark": "mb.Bench.broken" }));
        let err = assemble(&input).unwrap_err();
        assert_eq!(err.record(), Some(2));
        assert_eq!(err.field(), Some("secondaryMetrics"));
    }

    #[test]
    fn document_must_be_an_array() {
        let naming = BenchmarkNaming::default();
        let err = Assembler::new(&naming)
            .assemble_document(&json!({ "benchmark": "x" }))
            .unwrap_err();
        assert_eq!(err.record(), None);
    }

    #[test]
    fn streaming_matches_slice_assembly() {
        let naming = BenchmarkNaming::default();
        let assembler = Assembler::new(&naming);
        let from_slice = assembler.assemble(&records()).unwrap();
        let streamed = assembler.assemble_iter(records()).unwrap();
        assert_eq!(from_slice, streamed);
    }

    #[test]
    fn filter_by_variable_and_dimension() {
        let table = assemble(&records()).unwrap();
        let filter = RowFilter::new()
            .variable_in(["systemNanoTime"])
            .dimension_eq("language", "calc");
        let rows: Vec<_> = table.rows_where(&filter).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].benchmark, "full");
    }

    #[test]
    fn distinct_skips_rows_without_the_column() {
        let table = assemble(&records()).unwrap();
        assert_eq!(table.distinct("change"), ["c1", "c2"]);
        assert_eq!(table.distinct("layer"), ["validation"]);
        assert!(table.distinct("missing").is_empty());
    }

    #[test]
    fn null_param_still_enters_the_schema() {
        let input = vec![
            json!({
                "benchmark": "mb.Bench.full",
                "params": { "language": "calc", "store": null },
                "secondaryMetrics": { "c1:systemNanoTime": metric(1.0) }
            }),
            json!({
                "benchmark": "mb.Bench.full",
                "params": { "language": "chars" },
                "secondaryMetrics": { "c1:systemNanoTime": metric(2.0) }
            }),
        ];
        let table = assemble(&input).unwrap();
        assert_eq!(table.dimensions(), ["language", "store"]);
        assert!(table.iter().all(|row| row.dimension("store").is_none()));
    }

    #[test]
    fn colliding_param_aborts_assembly() {
        let input = vec![json!({
            "benchmark": "mb.Bench.full",
            "params": { "benchmark": "X" },
            "secondaryMetrics": { "c1:systemNanoTime": metric(1.0) }
        })];
        let err = assemble(&input).unwrap_err();
        assert_eq!(err.record(), Some(0));
        assert_eq!(err.field(), Some("params.benchmark"));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = assemble(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.dimensions().is_empty());
    }
}
