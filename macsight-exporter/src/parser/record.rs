//! Line-delimited JSON record decoding.

use serde::de::DeserializeOwned;
use tracing::warn;

use super::Snapshot;

/// A JSON record that knows how to flatten itself into a snapshot.
pub trait Record: DeserializeOwned {
    /// Store every present field under its dotted key path.
    fn observe(self, snapshot: &mut Snapshot);
}

/// Decode one record per line and flatten the last valid one.
///
/// Blank lines are ignored. Lines that are not valid records are logged and
/// skipped without affecting the lines after them.
pub fn decode<T: Record>(text: &str) -> Snapshot {
    let mut last = None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(line) {
            Ok(record) => last = Some(record),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping undecodable record"),
        }
    }

    let mut snapshot = Snapshot::new();
    if let Some(record) = last {
        record.observe(&mut snapshot);
    }
    snapshot
}
