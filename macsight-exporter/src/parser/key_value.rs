//! `key: value` line parsing.
//!
//! Each line is split on its first `:`. The key is the trimmed left side; the
//! value is the trimmed right side with trailing periods removed. Lines whose
//! value is not a number (banners, blank lines) are skipped. A repeated key
//! keeps the last value.

use tracing::trace;

use super::{Snapshot, parse_number};

/// Parse `key: value.` lines into a snapshot.
pub fn parse(text: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for line in text.lines() {
        let Some((key, value)) = parse_line(line) else {
            if !line.trim().is_empty() {
                trace!(line, "Skipping line without a numeric value");
            }
            continue;
        };
        snapshot.set(key, value);
    }

    snapshot
}

/// Parse a single line into its key and numeric value.
pub fn parse_line(line: &str) -> Option<(&str, f64)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim().trim_end_matches('.');
    parse_number(value).map(|value| (key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("Pages free:                               3624."),
            Some(("Pages free", 3624.0))
        );
        assert_eq!(
            parse_line("Pages wired down:   120233."),
            Some(("Pages wired down", 120233.0))
        );
        assert_eq!(
            parse_line("\"Translation faults\":  862358720."),
            Some(("\"Translation faults\"", 862358720.0))
        );
    }

    #[test]
    fn test_banner_is_skipped() {
        assert_eq!(
            parse_line("Mach Virtual Memory Statistics: (page size of 16384 bytes)"),
            None
        );
    }

    #[test]
    fn test_line_without_colon_is_skipped() {
        assert_eq!(parse_line("Pages free 3624."), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_value_containing_colon_is_skipped() {
        assert_eq!(parse_line("Boot time: 09:12:44"), None);
    }

    #[test]
    fn test_empty_key_is_skipped() {
        assert_eq!(parse_line(": 12."), None);
    }

    #[test]
    fn test_value_without_period() {
        assert_eq!(parse_line("Swapins: 0"), Some(("Swapins", 0.0)));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let snapshot = parse("Pageins: 1.\nPageins: 2.\n");
        assert_eq!(snapshot.scalar("Pageins"), Some(2.0));
    }

    #[test]
    fn test_parse_skips_bad_lines_and_keeps_going() {
        let text = "Mach Virtual Memory Statistics: (page size of 16384 bytes)\n\
                    Pages free: 100.\n\
                    Pages active: lots.\n\
                    garbage\n\
                    Pages inactive: 300.\n";

        let snapshot = parse(text);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.scalar("Pages free"), Some(100.0));
        assert_eq!(snapshot.scalar("Pages inactive"), Some(300.0));
        assert!(!snapshot.contains("Pages active"));
    }
}
