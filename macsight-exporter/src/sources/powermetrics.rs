//! `powermetrics` CPU and GPU power readings.
//!
//! The report is free text meant for people. Each reading is located by a
//! [`TextRule`], so a wording change in a new macOS release only touches the
//! rule table below.

use std::time::Duration;

use macsight_common::{MetricDescriptor, Sample};

use super::Source;
use crate::mapper::{self, MappingRule};
use crate::parser::text_scan::{self, TextRule};
use crate::registry::*;
use crate::runner::{CommandSpec, RawCapture, SourceId};

const PROGRAM: &str = "powermetrics";
const ARGS: &[&str] = &["--samplers", "cpu_power,gpu_power", "-i", "1", "-n", "1"];

const MHZ_TO_HZ: f64 = 1_000_000.0;

const CPU_POWER: TextRule = TextRule::scalar("CPU Power", "CPU Power:", "Power:", "mW");
const GPU_POWER: TextRule = TextRule::scalar("GPU Power", "GPU Power:", "Power:", "mW");
const CPU_FREQUENCY: TextRule =
    TextRule::per_core("CPU frequency", "frequency:", "frequency:", "MHz");
const CPU_ACTIVE_RESIDENCY: TextRule = TextRule::per_core(
    "CPU active residency",
    "active residency:",
    "residency:",
    "%",
);
const CPU_IDLE_RESIDENCY: TextRule =
    TextRule::per_core("CPU idle residency", "idle residency:", "residency:", "%");
const GPU_ACTIVE_RESIDENCY: TextRule = TextRule::scalar(
    "GPU active residency",
    "GPU HW active residency:",
    "residency:",
    "%",
);
const GPU_IDLE_RESIDENCY: TextRule = TextRule::scalar(
    "GPU idle residency",
    "GPU idle residency:",
    "residency:",
    "%",
);

static TEXT_RULES: &[TextRule] = &[
    CPU_POWER,
    GPU_POWER,
    CPU_FREQUENCY,
    CPU_ACTIVE_RESIDENCY,
    CPU_IDLE_RESIDENCY,
    GPU_ACTIVE_RESIDENCY,
    GPU_IDLE_RESIDENCY,
];

static RULES: &[MappingRule] = &[
    MappingRule::scaled(&["CPU frequency"], &POWERMETRICS_CPU_FREQUENCY, MHZ_TO_HZ),
    MappingRule::new(&["CPU Power"], &POWERMETRICS_CPU_POWER),
    MappingRule::new(&["GPU Power"], &POWERMETRICS_GPU_POWER),
    MappingRule::new(&["CPU active residency"], &POWERMETRICS_CPU_ACTIVE_RESIDENCY),
    MappingRule::new(&["CPU idle residency"], &POWERMETRICS_CPU_IDLE_RESIDENCY),
    MappingRule::new(&["GPU active residency"], &POWERMETRICS_GPU_ACTIVE_RESIDENCY),
    MappingRule::new(&["GPU idle residency"], &POWERMETRICS_GPU_IDLE_RESIDENCY),
];

/// Runs one `powermetrics` sample of the CPU and GPU power samplers.
///
/// `powermetrics` needs root; without it the command exits non-zero and the
/// source contributes nothing.
#[derive(Debug, Clone)]
pub struct Powermetrics {
    timeout: Duration,
}

impl Powermetrics {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for Powermetrics {
    fn default() -> Self {
        Self::new(SourceId::Powermetrics.default_timeout())
    }
}

impl Source for Powermetrics {
    fn id(&self) -> SourceId {
        SourceId::Powermetrics
    }

    fn command(&self) -> CommandSpec {
        CommandSpec {
            program: PROGRAM,
            args: ARGS,
            timeout: self.timeout,
        }
    }

    fn descriptors(&self) -> &'static [&'static MetricDescriptor] {
        POWERMETRICS_METRICS
    }

    fn samples(&self, capture: &RawCapture) -> Vec<Sample> {
        mapper::map(RULES, &text_scan::scan(&capture.stdout, TEXT_RULES))
    }
}
