//! `macmon pipe` JSON readings.
//!
//! Values are exported as macmon prints them. In particular the usage half
//! of the `[frequency, usage]` pairs is whatever scale macmon reports.

use std::time::Duration;

use macsight_common::{MetricDescriptor, Sample};
use serde::Deserialize;

use super::Source;
use crate::mapper::{self, MappingRule};
use crate::parser::Snapshot;
use crate::parser::record::{self, Record};
use crate::registry::*;
use crate::runner::{CommandSpec, RawCapture, SourceId};

const PROGRAM: &str = "macmon";
const ARGS: &[&str] = &["pipe", "-s", "1"];

static RULES: &[MappingRule] = &[
    MappingRule::new(&["all_power"], &MACMON_ALL_POWER),
    MappingRule::new(&["ane_power"], &MACMON_ANE_POWER),
    MappingRule::new(&["cpu_power"], &MACMON_CPU_POWER),
    MappingRule::new(&["gpu_power"], &MACMON_GPU_POWER),
    MappingRule::new(&["gpu_ram_power"], &MACMON_GPU_RAM_POWER),
    MappingRule::new(&["ram_power"], &MACMON_RAM_POWER),
    MappingRule::new(&["sys_power"], &MACMON_SYS_POWER),
    MappingRule::new(&["temp.cpu_temp_avg"], &MACMON_CPU_TEMPERATURE),
    MappingRule::new(&["temp.gpu_temp_avg"], &MACMON_GPU_TEMPERATURE),
    MappingRule::new(&["ecpu_usage.frequency"], &MACMON_ECPU_FREQUENCY),
    MappingRule::new(&["ecpu_usage.percent"], &MACMON_ECPU_USAGE),
    MappingRule::new(&["pcpu_usage.frequency"], &MACMON_PCPU_FREQUENCY),
    MappingRule::new(&["pcpu_usage.percent"], &MACMON_PCPU_USAGE),
    MappingRule::new(&["gpu_usage.frequency"], &MACMON_GPU_FREQUENCY),
    MappingRule::new(&["gpu_usage.percent"], &MACMON_GPU_USAGE),
    MappingRule::new(&["memory.ram_total"], &MACMON_RAM_TOTAL),
    MappingRule::new(&["memory.ram_usage"], &MACMON_RAM_USED),
    MappingRule::new(&["memory.swap_total"], &MACMON_SWAP_TOTAL),
    MappingRule::new(&["memory.swap_usage"], &MACMON_SWAP_USED),
];

/// One line of `macmon pipe` output. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MacmonRecord {
    all_power: Option<f64>,
    ane_power: Option<f64>,
    cpu_power: Option<f64>,
    gpu_power: Option<f64>,
    gpu_ram_power: Option<f64>,
    ram_power: Option<f64>,
    sys_power: Option<f64>,
    temp: Option<Temperatures>,
    memory: Option<Memory>,
    /// `[frequency MHz, usage]`
    ecpu_usage: Option<Vec<f64>>,
    pcpu_usage: Option<Vec<f64>>,
    gpu_usage: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Temperatures {
    cpu_temp_avg: Option<f64>,
    gpu_temp_avg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Memory {
    ram_total: Option<f64>,
    ram_usage: Option<f64>,
    swap_total: Option<f64>,
    swap_usage: Option<f64>,
}

fn set(snapshot: &mut Snapshot, key: &str, value: Option<f64>) {
    if let Some(value) = value {
        snapshot.set(key, value);
    }
}

/// Store a `[frequency, usage]` pair. Pairs with fewer than two elements are skipped.
fn set_usage(snapshot: &mut Snapshot, prefix: &str, pair: Option<Vec<f64>>) {
    if let Some([frequency, usage, ..]) = pair.as_deref() {
        snapshot.set(format!("{prefix}.frequency"), *frequency);
        snapshot.set(format!("{prefix}.percent"), *usage);
    }
}

impl Record for MacmonRecord {
    fn observe(self, snapshot: &mut Snapshot) {
        set(snapshot, "all_power", self.all_power);
        set(snapshot, "ane_power", self.ane_power);
        set(snapshot, "cpu_power", self.cpu_power);
        set(snapshot, "gpu_power", self.gpu_power);
        set(snapshot, "gpu_ram_power", self.gpu_ram_power);
        set(snapshot, "ram_power", self.ram_power);
        set(snapshot, "sys_power", self.sys_power);

        if let Some(temp) = self.temp {
            set(snapshot, "temp.cpu_temp_avg", temp.cpu_temp_avg);
            set(snapshot, "temp.gpu_temp_avg", temp.gpu_temp_avg);
        }

        set_usage(snapshot, "ecpu_usage", self.ecpu_usage);
        set_usage(snapshot, "pcpu_usage", self.pcpu_usage);
        set_usage(snapshot, "gpu_usage", self.gpu_usage);

        if let Some(memory) = self.memory {
            set(snapshot, "memory.ram_total", memory.ram_total);
            set(snapshot, "memory.ram_usage", memory.ram_usage);
            set(snapshot, "memory.swap_total", memory.swap_total);
            set(snapshot, "memory.swap_usage", memory.swap_usage);
        }
    }
}

/// Runs `macmon pipe` for a single sample.
#[derive(Debug, Clone)]
pub struct Macmon {
    timeout: Duration,
}

impl Macmon {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for Macmon {
    fn default() -> Self {
        Self::new(SourceId::Macmon.default_timeout())
    }
}

impl Source for Macmon {
    fn id(&self) -> SourceId {
        SourceId::Macmon
    }

    fn command(&self) -> CommandSpec {
        CommandSpec {
            program: PROGRAM,
            args: ARGS,
            timeout: self.timeout,
        }
    }

    fn descriptors(&self) -> &'static [&'static MetricDescriptor] {
        MACMON_METRICS
    }

    fn samples(&self, capture: &RawCapture) -> Vec<Sample> {
        mapper::map(RULES, &record::decode::<MacmonRecord>(&capture.stdout))
    }
}
