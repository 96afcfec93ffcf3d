//! Display names for JMH benchmark identifiers.

use serde::Deserialize;

/// How a fully qualified JMH benchmark identifier is shortened for display.
///
/// Literal prefixes are tried first, in order. If none matches and
/// `strip_qualifier` is set, everything up to and including the last `.` is
/// dropped, turning `mb.pie.bench.spoofax3.Spoofax3Bench.full` into `full`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BenchmarkNaming {
    /// Namespace prefixes to strip.
    pub prefixes: Vec<String>,
    /// Strip the `package.Class.` qualifier when no prefix matched.
    pub strip_qualifier: bool,
}

impl Default for BenchmarkNaming {
    fn default() -> Self {
        Self {
            prefixes: Vec::new(),
            strip_qualifier: true,
        }
    }
}

impl BenchmarkNaming {
    /// Keep identifiers unchanged.
    pub fn verbatim() -> Self {
        Self {
            prefixes: Vec::new(),
            strip_qualifier: false,
        }
    }

    /// Strip only the given literal prefixes.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            strip_qualifier: false,
        }
    }

    /// Shorten `benchmark` for display. Never fails; unmatched names are
    /// returned as-is.
    pub fn display_name<'a>(&self, benchmark: &'a str) -> &'a str {
        if let Some(stripped) = self
            .prefixes
            .iter()
            .find_map(|prefix| benchmark.strip_prefix(prefix.as_str()))
        {
            return stripped;
        }
        if self.strip_qualifier {
            if let Some((_, name)) = benchmark.rsplit_once('.') {
                return name;
            }
        }
        benchmark
    }
}
