//! Parsing strategies that turn raw command output into a [`Snapshot`].
//!
//! - [`key_value`] - `key: value.` lines (`vm_stat`)
//! - [`text_scan`] - marker/unit scanning of free text (`powermetrics`)
//! - [`record`] - one JSON record per line (`macmon pipe`)
//!
//! None of the strategies fail: lines that cannot be understood are skipped.

pub mod key_value;
pub mod record;
pub mod text_scan;

use std::collections::HashMap;

/// One parsed value with its label values (empty for scalar keys).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub labels: Vec<String>,
    pub value: f64,
}

/// Observations of one capture, keyed by the name found in the source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: HashMap<String, Vec<Observation>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar value, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.entries.insert(
            key.into(),
            vec![Observation {
                labels: Vec::new(),
                value,
            }],
        );
    }

    /// Set a scalar value unless the key already has one.
    ///
    /// Returns `true` when the value was stored.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: f64) -> bool {
        self.insert_if_absent(key.into(), Vec::new(), value)
    }

    /// Append a labeled value unless the same label set was already seen for the key.
    ///
    /// Returns `true` when the value was stored.
    pub fn push_if_absent(&mut self, key: impl Into<String>, labels: Vec<String>, value: f64) -> bool {
        self.insert_if_absent(key.into(), labels, value)
    }

    fn insert_if_absent(&mut self, key: String, labels: Vec<String>, value: f64) -> bool {
        let observations = self.entries.entry(key).or_default();
        if observations.iter().any(|o| o.labels == labels) {
            return false;
        }
        observations.push(Observation { labels, value });
        true
    }

    /// Get every observation recorded for a key, in parse order.
    pub fn get(&self, key: &str) -> Option<&[Observation]> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .filter(|observations| !observations.is_empty())
    }

    /// Get the unlabeled value of a key.
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key)?
            .iter()
            .find(|o| o.labels.is_empty())
            .map(|o| o.value)
    }

    /// Check whether a key has at least one observation.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of keys with observations.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|o| !o.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a numeric field. Only finite numbers are accepted.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
