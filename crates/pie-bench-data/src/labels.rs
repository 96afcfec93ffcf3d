//! Ordered key → display-label mappings.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

/// An ordered mapping from a key (metric name, dimension name or dimension
/// value) to the label shown for it.
///
/// Entry order is significant: it is the order in which facets are laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    entries: Vec<(String, String)>,
}

impl Labels {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the label of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    /// Returns `true` if `key` is listed.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The label for `key`, if listed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.as_str())
    }

    /// The label for `key`, falling back to the key itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// Position of `key` in listing order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Listed keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Self::new();
        for (k, v) in iter {
            labels.insert(k, v);
        }
        labels
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelsVisitor;

        impl<'de> Visitor<'de> for LabelsVisitor {
            type Value = Labels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of string labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Labels, A::Error> {
                let mut labels = Labels::new();
                while let Some((key, label)) = map.next_entry::<String, String>()? {
                    labels.insert(key, label);
                }
                Ok(labels)
            }
        }

        deserializer.deserialize_map(LabelsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_labels_as_itself() {
        let labels = Labels::new().with("systemNanoTime", "Time");
        assert_eq!(labels.label("systemNanoTime"), "Time");
        assert_eq!(labels.label("executedTasks"), "executedTasks");
    }

    #[test]
    fn insert_keeps_first_position() {
        let mut labels = Labels::new().with("a", "A").with("b", "B");
        labels.insert("a", "Alpha");
        assert_eq!(labels.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(labels.get("a"), Some("Alpha"));
    }

    #[test]
    fn deserializes_in_document_order() {
        let labels: Labels = toml::from_str("zeta = \"Z\"\nalpha = \"A\"\nmid = \"M\"\n").unwrap();
        assert_eq!(labels.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }
}
