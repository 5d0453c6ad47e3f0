//! Metric identities and the samples produced for them.

use std::fmt;

/// How a metric's value evolves between scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Point-in-time value that can go up or down.
    Gauge,
    /// Monotonically increasing total.
    Counter,
}

impl MetricKind {
    /// Get the string used in `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable identity of one exported metric.
///
/// Descriptors are declared as `static` items and shared by reference, so a
/// [`Sample`] can point back to its descriptor without copying the strings.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    /// Full metric name (e.g. `vmstat_pages_free_count`).
    pub name: &'static str,
    /// Text for the `# HELP` line.
    pub help: &'static str,
    /// Gauge or counter.
    pub kind: MetricKind,
    /// Ordered label dimension names.
    pub label_names: &'static [&'static str],
}

impl MetricDescriptor {
    /// Declare a gauge without labels.
    pub const fn gauge(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            kind: MetricKind::Gauge,
            label_names: &[],
        }
    }

    /// Declare a counter without labels.
    pub const fn counter(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            kind: MetricKind::Counter,
            label_names: &[],
        }
    }

    /// Attach label dimensions to the descriptor.
    pub const fn with_labels(mut self, label_names: &'static [&'static str]) -> Self {
        self.label_names = label_names;
        self
    }
}

/// One resolved observation: a descriptor, its label values and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub descriptor: &'static MetricDescriptor,
    /// Values in the same order as `descriptor.label_names`.
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Sample {
    /// Create a sample for an unlabeled metric.
    ///
    /// Returns `None` when the descriptor declares label dimensions.
    pub fn new(descriptor: &'static MetricDescriptor, value: f64) -> Option<Self> {
        Self::labeled(descriptor, Vec::new(), value)
    }

    /// Create a sample with label values.
    ///
    /// Returns `None` when the number of values does not match the
    /// descriptor's label dimensions.
    pub fn labeled(
        descriptor: &'static MetricDescriptor,
        label_values: Vec<String>,
        value: f64,
    ) -> Option<Self> {
        if label_values.len() != descriptor.label_names.len() {
            return None;
        }

        Some(Self {
            descriptor,
            label_values,
            value,
        })
    }

    /// Iterate over `(label name, label value)` pairs.
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.descriptor
            .label_names
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }

    /// Check whether this sample belongs to the given descriptor.
    pub fn is_for(&self, descriptor: &MetricDescriptor) -> bool {
        std::ptr::eq(self.descriptor, descriptor)
    }
}
