//! Decoding of compound `<change>:<metric>` secondary metric keys.

use std::fmt;

/// A secondary metric key split into the change that produced the number
/// and the quantity that was measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompoundKey<'a> {
    /// Scenario applied before the measurement.
    pub change: &'a str,
    /// Measured quantity. May itself contain `:`.
    pub metric: &'a str,
}

impl<'a> CompoundKey<'a> {
    /// Separator between the change and the metric name.
    pub const SEPARATOR: char = ':';

    /// Split `key` at its first separator.
    ///
    /// Returns `None` for keys outside the multiplexed family (no separator),
    /// such as JMH's own profiler counters.
    pub fn decode(key: &'a str) -> Option<Self> {
        let (change, metric) = key.split_once(Self::SEPARATOR)?;
        Some(Self { change, metric })
    }
}

impl fmt::Display for CompoundKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.change, Self::SEPARATOR, self.metric)
    }
}
