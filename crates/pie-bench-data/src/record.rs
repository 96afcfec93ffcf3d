//! Row types of the long-form table.

/// Dimension values of one record, in the order they appear in `params`.
///
/// A dimension the record does not carry is simply not present; lookups
/// return `None` rather than a placeholder value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    entries: Vec<(String, String)>,
}

impl Dimensions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension value. Later values for the same name replace earlier ones.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of dimension `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Dimension names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of dimensions present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no dimension is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut dims = Self::new();
        for (name, value) in iter {
            dims.insert(name, value);
        }
        dims
    }
}

/// A JMH metric value object (`score`, `scoreError`, `scoreUnit`).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Measured score.
    pub score: f64,
    /// Uncertainty of the score. `NaN` when JMH had too few samples.
    pub error: f64,
    /// Unit of the score.
    pub unit: String,
}

/// One long-form row: a single metric measured for a single change of a
/// single benchmark and parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Change identifier (the row key; shared by many rows).
    pub change: String,
    /// Benchmark display name.
    pub benchmark: String,
    /// Dimension values carried over from the record's `params`.
    pub dimensions: Dimensions,
    /// Metric name.
    pub variable: String,
    /// Score.
    pub value: f64,
    /// Score error.
    pub error: f64,
    /// Score unit.
    pub unit: String,
}

impl Observation {
    /// Value of dimension `name` for this row.
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions.get(name)
    }

    /// Value of a named column: one of the fixed string columns or a
    /// dimension. Numeric columns are not addressable here.
    pub fn column(&self, name: &str) -> Option<&str> {
        match name {
            "change" => Some(self.change.as_str()),
            "benchmark" => Some(self.benchmark.as_str()),
            "variable" => Some(self.variable.as_str()),
            "unit" => Some(self.unit.as_str()),
            _ => self.dimension(name),
        }
    }
}
