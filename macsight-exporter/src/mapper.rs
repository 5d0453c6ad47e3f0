//! Mapping of snapshot keys onto metric descriptors.

use macsight_common::{MetricDescriptor, Sample};
use tracing::trace;

use crate::parser::Snapshot;

/// Binds snapshot keys to one metric.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    /// Keys to look up, in preference order. The first one present is used.
    pub keys: &'static [&'static str],
    pub descriptor: &'static MetricDescriptor,
    /// Factor applied to every value (e.g. MHz to Hz).
    pub scale: f64,
}

impl MappingRule {
    pub const fn new(keys: &'static [&'static str], descriptor: &'static MetricDescriptor) -> Self {
        Self {
            keys,
            descriptor,
            scale: 1.0,
        }
    }

    pub const fn scaled(
        keys: &'static [&'static str],
        descriptor: &'static MetricDescriptor,
        scale: f64,
    ) -> Self {
        Self {
            keys,
            descriptor,
            scale,
        }
    }
}

/// Produce samples for every rule whose key is present, in rule order.
///
/// Observations whose label count does not fit the descriptor are dropped.
pub fn map(rules: &[MappingRule], snapshot: &Snapshot) -> Vec<Sample> {
    let mut samples = Vec::new();

    for rule in rules {
        let Some(observations) = rule.keys.iter().find_map(|key| snapshot.get(key)) else {
            continue;
        };

        for observation in observations {
            match Sample::labeled(
                rule.descriptor,
                observation.labels.clone(),
                observation.value * rule.scale,
            ) {
                Some(sample) => samples.push(sample),
                None => trace!(
                    metric = rule.descriptor.name,
                    labels = ?observation.labels,
                    "Dropping observation with mismatched labels"
                ),
            }
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    static FREE: MetricDescriptor = MetricDescriptor::gauge("test_free_count", "Free.");
    static COW: MetricDescriptor = MetricDescriptor::counter("test_cow_total", "Cow.");
    static FREQ: MetricDescriptor =
        MetricDescriptor::gauge("test_frequency_hertz", "Frequency.").with_labels(&["core"]);

    static RULES: &[MappingRule] = &[
        MappingRule::new(&["Pages free"], &FREE),
        MappingRule::new(&["Copy-on-writes", "Pages copy-on-write"], &COW),
        MappingRule::scaled(&["CPU frequency"], &FREQ, 1e6),
    ];

    #[test]
    fn test_rule_order_is_output_order() {
        let mut snapshot = Snapshot::new();
        snapshot.push_if_absent("CPU frequency", vec!["0".into()], 1200.0);
        snapshot.set("Copy-on-writes", 7.0);
        snapshot.set("Pages free", 3.0);

        let samples = map(RULES, &snapshot);
        let names: Vec<_> = samples.iter().map(|s| s.descriptor.name).collect();
        assert_eq!(
            names,
            vec!["test_free_count", "test_cow_total", "test_frequency_hertz"]
        );
    }

    #[test]
    fn test_scale_applied() {
        let mut snapshot = Snapshot::new();
        snapshot.push_if_absent("CPU frequency", vec!["3".into()], 2400.0);

        let samples = map(RULES, &snapshot);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 2_400_000_000.0);
        assert_eq!(samples[0].label_values, vec!["3".to_string()]);
    }

    #[test]
    fn test_alias_key() {
        let mut snapshot = Snapshot::new();
        snapshot.set("Pages copy-on-write", 42.0);

        let samples = map(RULES, &snapshot);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].is_for(&COW));
        assert_eq!(samples[0].value, 42.0);
    }

    #[test]
    fn test_first_alias_preferred() {
        let mut snapshot = Snapshot::new();
        snapshot.set("Copy-on-writes", 1.0);
        snapshot.set("Pages copy-on-write", 2.0);

        let samples = map(RULES, &snapshot);
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn test_absent_key_is_skipped() {
        let mut snapshot = Snapshot::new();
        snapshot.set("Pages free", 3.0);

        let samples = map(RULES, &snapshot);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].is_for(&FREE));
    }

    #[test]
    fn test_label_mismatch_dropped() {
        let mut snapshot = Snapshot::new();
        snapshot.set("CPU frequency", 1200.0);

        assert!(map(RULES, &snapshot).is_empty());
    }
}
