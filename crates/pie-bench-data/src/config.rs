//! Plot configuration loaded from a TOML file.
//!
//! Every section is optional. A missing `[[charts]]` list selects the
//! standard chart set from [`ChartSpec::defaults`].
//!
//! ```toml
//! [benchmark]
//! prefixes = ["mb.pie.bench.spoofax3.Spoofax3Bench."]
//! strip-qualifier = true
//!
//! [dimensions]
//! language = "Language"
//!
//! [[charts]]
//! title = "Layer comparison (language={language})"
//! facet = "dimension:layer"
//! metrics = { systemNanoTime = "Time" }
//! filters = { language = "calc" }
//! facet-labels = { validation = "Validation", noop = "None" }
//! ```

use std::fmt;

use serde::Deserialize;

use crate::chart::{ChartSpec, FacetAxis};
use crate::labels::Labels;
use crate::naming::BenchmarkNaming;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PlotConfig {
    /// `[benchmark]` section: display-name rule.
    #[serde(default)]
    pub benchmark: BenchmarkNaming,
    /// `[dimensions]` section: dimension display labels.
    #[serde(default)]
    pub dimensions: Labels,
    /// `[[charts]]` entries.
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

/// A `[[charts]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChartConfig {
    /// Title template.
    pub title: String,
    /// `variable` or `dimension:<name>`.
    #[serde(default = "default_facet")]
    pub facet: String,
    /// Metrics to include, with labels.
    pub metrics: Labels,
    /// Required dimension values.
    #[serde(default)]
    pub filters: Labels,
    /// Labels and order of dimension facet values.
    #[serde(default)]
    pub facet_labels: Labels,
}

fn default_facet() -> String {
    "variable".into()
}

/// Errors raised while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The TOML text could not be decoded.
    Toml(toml::de::Error),
    /// A chart entry is semantically invalid.
    InvalidChart {
        /// Title of the offending chart.
        title: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(err) => write!(f, "invalid configuration: {err}"),
            Self::InvalidChart { title, reason } => write!(f, "chart '{title}': {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Toml(err) => Some(err),
            Self::InvalidChart { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}

impl PlotConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on syntax or schema errors and
    /// [`ConfigError::InvalidChart`] if a chart entry fails validation.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.chart_specs()?;
        Ok(config)
    }

    /// Resolve the chart entries, or the standard set if none are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChart`] for an unparseable facet or an
    /// empty metric list.
    pub fn chart_specs(&self) -> Result<Vec<ChartSpec>, ConfigError> {
        if self.charts.is_empty() {
            return Ok(ChartSpec::defaults());
        }
        self.charts.iter().map(ChartConfig::to_spec).collect()
    }

    /// Display label of a dimension column.
    pub fn dimension_label<'a>(&'a self, name: &'a str) -> &'a str {
        self.dimensions.label(name)
    }
}

impl ChartConfig {
    /// Validate the entry and turn it into a [`ChartSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChart`] for an unparseable facet or an
    /// empty metric list.
    pub fn to_spec(&self) -> Result<ChartSpec, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidChart {
            title: self.title.clone(),
            reason,
        };
        let facet: FacetAxis = self.facet.parse().map_err(invalid)?;
        if self.metrics.is_empty() {
            return Err(invalid("no metrics listed".into()));
        }
        Ok(ChartSpec {
            title: self.title.clone(),
            metrics: self.metrics.clone(),
            filters: self
                .filters
                .iter()
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
            facet,
            facet_labels: self.facet_labels.clone(),
        })
    }
}
