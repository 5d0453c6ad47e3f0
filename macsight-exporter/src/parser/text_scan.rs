//! Marker scanning of free-form report text.
//!
//! A [`TextRule`] matches a line when the line contains both its marker and
//! its unit. The value is the whitespace token right after the rule's value
//! word, with the unit suffix removed. Per-core rules also need a `CPU <n>`
//! token pair on the same line, and `<n>` becomes the single label value.
//!
//! The first match wins for every (key, labels) pair, so a value repeated
//! further down the report is ignored.

use tracing::trace;

use super::{Snapshot, parse_number};

/// How to find one value in report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    /// Snapshot key the value is stored under.
    pub key: &'static str,
    /// Literal text that must appear in the line.
    pub marker: &'static str,
    /// Token that precedes the value.
    pub value_word: &'static str,
    /// Unit text that must appear in the line and is stripped from the value.
    pub unit: &'static str,
    /// Whether the line is labeled with a CPU core index.
    pub per_core: bool,
}

impl TextRule {
    pub const fn scalar(
        key: &'static str,
        marker: &'static str,
        value_word: &'static str,
        unit: &'static str,
    ) -> Self {
        Self {
            key,
            marker,
            value_word,
            unit,
            per_core: false,
        }
    }

    pub const fn per_core(
        key: &'static str,
        marker: &'static str,
        value_word: &'static str,
        unit: &'static str,
    ) -> Self {
        Self {
            key,
            marker,
            value_word,
            unit,
            per_core: true,
        }
    }

    /// Try to extract this rule's value (and core label) from one line.
    pub fn extract(&self, line: &str) -> Option<(Vec<String>, f64)> {
        if !line.contains(self.marker) || !line.contains(self.unit) {
            return None;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();

        let labels = if self.per_core {
            vec![core_index(&tokens)?.to_string()]
        } else {
            Vec::new()
        };

        let position = tokens.iter().position(|token| *token == self.value_word)?;
        let raw = tokens.get(position + 1)?;
        let raw = raw.strip_suffix(self.unit).unwrap_or(raw);

        parse_number(raw).map(|value| (labels, value))
    }
}

/// Find the integer following a literal `CPU` token.
fn core_index(tokens: &[&str]) -> Option<u32> {
    tokens
        .windows(2)
        .find(|pair| pair[0] == "CPU")
        .and_then(|pair| pair[1].parse().ok())
}

/// Scan report text with every rule.
pub fn scan(text: &str, rules: &[TextRule]) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for line in text.lines() {
        for rule in rules {
            let Some((labels, value)) = rule.extract(line) else {
                continue;
            };

            if !snapshot.push_if_absent(rule.key, labels, value) {
                trace!(key = rule.key, line, "Ignoring repeated reading");
            }
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    const POWER: TextRule = TextRule::scalar("CPU Power", "CPU Power:", "Power:", "mW");
    const FREQUENCY: TextRule =
        TextRule::per_core("CPU frequency", "frequency:", "frequency:", "MHz");
    const ACTIVE: TextRule =
        TextRule::per_core("CPU active residency", "active residency:", "residency:", "%");

    #[test]
    fn test_scalar_extract() {
        assert_eq!(POWER.extract("CPU Power: 1339 mW"), Some((vec![], 1339.0)));
    }

    #[test]
    fn test_unit_required() {
        assert_eq!(POWER.extract("CPU Power: 1339"), None);
    }

    #[test]
    fn test_marker_required() {
        assert_eq!(POWER.extract("Combined Power (CPU + GPU + ANE): 1345 mW"), None);
    }

    #[test]
    fn test_per_core_extract() {
        assert_eq!(
            FREQUENCY.extract("CPU 3 frequency: 2400 MHz"),
            Some((vec!["3".to_string()], 2400.0))
        );
    }

    #[test]
    fn test_per_core_needs_core_index() {
        assert_eq!(FREQUENCY.extract("E-Cluster HW active frequency: 1099 MHz"), None);
        assert_eq!(FREQUENCY.extract("CPU x frequency: 2400 MHz"), None);
    }

    #[test]
    fn test_unit_suffix_stripped() {
        assert_eq!(
            ACTIVE.extract("CPU 0 active residency:  43.15% (600 MHz: .04% 972 MHz:  11%)"),
            Some((vec!["0".to_string()], 43.15))
        );
    }

    #[test]
    fn test_unparsable_value_dropped() {
        assert_eq!(ACTIVE.extract("CPU 0 active residency: n/a%"), None);
        assert_eq!(POWER.extract("CPU Power: mW"), None);
    }

    #[test]
    fn test_scan_first_occurrence_wins() {
        let text = "CPU Power: 1339 mW\nsomething else\nCPU Power: 9999 mW\n";
        let snapshot = scan(text, &[POWER]);

        assert_eq!(snapshot.scalar("CPU Power"), Some(1339.0));
        assert_eq!(snapshot.get("CPU Power").map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_scan_keeps_each_core() {
        let text = "CPU 0 frequency: 1200 MHz\nCPU 1 frequency: 1300 MHz\nCPU 0 frequency: 99 MHz\n";
        let snapshot = scan(text, &[FREQUENCY]);

        let observations = snapshot.get("CPU frequency").unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].labels, vec!["0".to_string()]);
        assert_eq!(observations[0].value, 1200.0);
        assert_eq!(observations[1].value, 1300.0);
    }

    #[test]
    fn test_scan_unrecognized_text() {
        let snapshot = scan("Machine model: Mac14,2\nOS version: 23A344\n", &[POWER, FREQUENCY]);
        assert!(snapshot.is_empty());
    }
}
