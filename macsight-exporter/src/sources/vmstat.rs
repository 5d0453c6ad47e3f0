//! `vm_stat` virtual memory counters.

use std::time::Duration;

use macsight_common::{MetricDescriptor, Sample};

use super::Source;
use crate::mapper::{self, MappingRule};
use crate::parser::key_value;
use crate::registry::*;
use crate::runner::{CommandSpec, RawCapture, SourceId};

const PROGRAM: &str = "vm_stat";

/// Line names. Later entries are spellings used by other macOS releases.
static RULES: &[MappingRule] = &[
    MappingRule::new(&["Pages free"], &VMSTAT_PAGES_FREE),
    MappingRule::new(&["Pages active"], &VMSTAT_PAGES_ACTIVE),
    MappingRule::new(&["Pages inactive"], &VMSTAT_PAGES_INACTIVE),
    MappingRule::new(&["Pages speculative"], &VMSTAT_PAGES_SPECULATIVE),
    MappingRule::new(&["Pages throttled"], &VMSTAT_PAGES_THROTTLED),
    MappingRule::new(&["Pages wired down"], &VMSTAT_PAGES_WIRED),
    MappingRule::new(&["Pages purgeable"], &VMSTAT_PAGES_PURGEABLE),
    MappingRule::new(&["Copy-on-writes", "Pages copy-on-write"], &VMSTAT_PAGES_COW_FAULTS),
    MappingRule::new(&["Pages zero filled"], &VMSTAT_PAGES_ZERO_FILLED),
    MappingRule::new(&["Pages reactivated"], &VMSTAT_PAGES_REACTIVATED),
    MappingRule::new(&["Pages purged"], &VMSTAT_PAGES_PURGED),
    MappingRule::new(&["File-backed pages"], &VMSTAT_PAGES_FILE_BACKED),
    MappingRule::new(&["Anonymous pages"], &VMSTAT_PAGES_ANONYMOUS),
    MappingRule::new(&["Pages stored in compressor"], &VMSTAT_PAGES_COMPRESSOR),
    MappingRule::new(&["Pages decompressed", "Decompressions"], &VMSTAT_PAGES_DECOMPRESSED),
    MappingRule::new(&["Pages compressed", "Compressions"], &VMSTAT_PAGES_COMPRESSED),
    MappingRule::new(&["Pageins"], &VMSTAT_PAGE_INS),
    MappingRule::new(&["Pageouts"], &VMSTAT_PAGE_OUTS),
    MappingRule::new(&["Page faults", "\"Translation faults\""], &VMSTAT_FAULTS),
    MappingRule::new(&["Swapins"], &VMSTAT_SWAP_INS),
    MappingRule::new(&["Swapouts"], &VMSTAT_SWAP_OUTS),
];

/// Runs `vm_stat` once and reports its page counters.
#[derive(Debug, Clone)]
pub struct VmStat {
    timeout: Duration,
}

impl VmStat {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for VmStat {
    fn default() -> Self {
        Self::new(SourceId::VmStat.default_timeout())
    }
}

impl Source for VmStat {
    fn id(&self) -> SourceId {
        SourceId::VmStat
    }

    fn command(&self) -> CommandSpec {
        CommandSpec {
            program: PROGRAM,
            args: &[],
            timeout: self.timeout,
        }
    }

    fn descriptors(&self) -> &'static [&'static MetricDescriptor] {
        VMSTAT_METRICS
    }

    fn samples(&self, capture: &RawCapture) -> Vec<Sample> {
        mapper::map(RULES, &key_value::parse(&capture.stdout))
    }

    fn constant_samples(&self) -> Vec<Sample> {
        page_size()
            .and_then(|size| Sample::new(&VMSTAT_PAGE_SIZE, size as f64))
            .into_iter()
            .collect()
    }
}

/// Page size of the running system.
#[cfg(unix)]
pub fn page_size() -> Option<u64> {
    // SAFETY: sysconf only reads a system constant.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(size).ok().filter(|size| *size > 0)
}

#[cfg(not(unix))]
pub fn page_size() -> Option<u64> {
    None
}
