//! Metric descriptors exported by each source.
//!
//! The per-source lists fix the exposition order: descriptors render in the
//! order they appear here.

use macsight_common::MetricDescriptor;

// powermetrics

/// The `core` label is the bare core index (`core="3"`), not the `cpu3` form
/// older dashboards may match on. Residency metrics use the same label.
pub static POWERMETRICS_CPU_FREQUENCY: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_cpu_frequency_hertz",
    "Current CPU frequency in Hertz.",
)
.with_labels(&["core"]);

/// Declared for compatibility; no reading feeds it.
pub static POWERMETRICS_CPU_TEMPERATURE: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_cpu_temperature_celsius",
    "Current CPU temperature in Celsius.",
)
.with_labels(&["sensor_id"]);

pub static POWERMETRICS_CPU_POWER: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_cpu_power_milliwatts",
    "Current CPU power in milliwatts.",
);

pub static POWERMETRICS_GPU_POWER: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_gpu_power_milliwatts",
    "Current GPU power in milliwatts.",
);

pub static POWERMETRICS_CPU_ACTIVE_RESIDENCY: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_cpu_active_residency_percent",
    "Current CPU active residency percentage.",
)
.with_labels(&["core"]);

pub static POWERMETRICS_CPU_IDLE_RESIDENCY: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_cpu_idle_residency_percent",
    "Current CPU idle residency percentage.",
)
.with_labels(&["core"]);

pub static POWERMETRICS_GPU_ACTIVE_RESIDENCY: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_gpu_active_residency_percent",
    "Current GPU active residency percentage.",
);

pub static POWERMETRICS_GPU_IDLE_RESIDENCY: MetricDescriptor = MetricDescriptor::gauge(
    "powermetrics_gpu_idle_residency_percent",
    "Current GPU idle residency percentage.",
);

pub static POWERMETRICS_METRICS: &[&MetricDescriptor] = &[
    &POWERMETRICS_CPU_FREQUENCY,
    &POWERMETRICS_CPU_TEMPERATURE,
    &POWERMETRICS_CPU_POWER,
    &POWERMETRICS_GPU_POWER,
    &POWERMETRICS_CPU_ACTIVE_RESIDENCY,
    &POWERMETRICS_CPU_IDLE_RESIDENCY,
    &POWERMETRICS_GPU_ACTIVE_RESIDENCY,
    &POWERMETRICS_GPU_IDLE_RESIDENCY,
];

// vm_stat

pub static VMSTAT_PAGES_FREE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_free_count", "Number of free pages.");
pub static VMSTAT_PAGES_ACTIVE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_active_count", "Number of active pages.");
pub static VMSTAT_PAGES_INACTIVE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_inactive_count", "Number of inactive pages.");
pub static VMSTAT_PAGES_SPECULATIVE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_speculative_count", "Number of speculative pages.");
pub static VMSTAT_PAGES_THROTTLED: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_throttled_count", "Number of throttled pages.");
pub static VMSTAT_PAGES_WIRED: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_wired_count", "Number of wired down pages.");
pub static VMSTAT_PAGES_PURGEABLE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_purgeable_count", "Number of purgeable pages.");
pub static VMSTAT_PAGES_COW_FAULTS: MetricDescriptor = MetricDescriptor::counter(
    "vmstat_pages_cow_faults_total",
    "Number of copy-on-write faults.",
);
pub static VMSTAT_PAGES_ZERO_FILLED: MetricDescriptor =
    MetricDescriptor::counter("vmstat_pages_zero_filled_total", "Number of pages zero filled.");
pub static VMSTAT_PAGES_REACTIVATED: MetricDescriptor =
    MetricDescriptor::counter("vmstat_pages_reactivated_total", "Number of pages reactivated.");
pub static VMSTAT_PAGES_PURGED: MetricDescriptor =
    MetricDescriptor::counter("vmstat_pages_purged_total", "Number of pages purged.");
pub static VMSTAT_PAGES_FILE_BACKED: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_file_backed_count", "Number of pages file-backed.");
pub static VMSTAT_PAGES_ANONYMOUS: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_pages_anonymous_count", "Number of pages anonymous.");
pub static VMSTAT_PAGES_COMPRESSOR: MetricDescriptor = MetricDescriptor::gauge(
    "vmstat_pages_compressor_count",
    "Number of pages used by compressor.",
);
pub static VMSTAT_PAGES_DECOMPRESSED: MetricDescriptor =
    MetricDescriptor::counter("vmstat_pages_decompressed_total", "Number of pages decompressed.");
pub static VMSTAT_PAGES_COMPRESSED: MetricDescriptor =
    MetricDescriptor::counter("vmstat_pages_compressed_total", "Number of pages compressed.");
pub static VMSTAT_PAGE_INS: MetricDescriptor =
    MetricDescriptor::counter("vmstat_page_ins_total", "Number of pageins.");
pub static VMSTAT_PAGE_OUTS: MetricDescriptor =
    MetricDescriptor::counter("vmstat_page_outs_total", "Number of pageouts.");
pub static VMSTAT_FAULTS: MetricDescriptor =
    MetricDescriptor::counter("vmstat_faults_total", "Number of page faults.");
pub static VMSTAT_SWAP_INS: MetricDescriptor =
    MetricDescriptor::counter("vmstat_swap_ins_total", "Number of swapins.");
pub static VMSTAT_SWAP_OUTS: MetricDescriptor =
    MetricDescriptor::counter("vmstat_swap_outs_total", "Number of swapouts.");
pub static VMSTAT_PAGE_SIZE: MetricDescriptor =
    MetricDescriptor::gauge("vmstat_page_size_bytes", "Size of pages in bytes.");

pub static VMSTAT_METRICS: &[&MetricDescriptor] = &[
    &VMSTAT_PAGES_FREE,
    &VMSTAT_PAGES_ACTIVE,
    &VMSTAT_PAGES_INACTIVE,
    &VMSTAT_PAGES_SPECULATIVE,
    &VMSTAT_PAGES_THROTTLED,
    &VMSTAT_PAGES_WIRED,
    &VMSTAT_PAGES_PURGEABLE,
    &VMSTAT_PAGES_COW_FAULTS,
    &VMSTAT_PAGES_ZERO_FILLED,
    &VMSTAT_PAGES_REACTIVATED,
    &VMSTAT_PAGES_PURGED,
    &VMSTAT_PAGES_FILE_BACKED,
    &VMSTAT_PAGES_ANONYMOUS,
    &VMSTAT_PAGES_COMPRESSOR,
    &VMSTAT_PAGES_DECOMPRESSED,
    &VMSTAT_PAGES_COMPRESSED,
    &VMSTAT_PAGE_INS,
    &VMSTAT_PAGE_OUTS,
    &VMSTAT_FAULTS,
    &VMSTAT_SWAP_INS,
    &VMSTAT_SWAP_OUTS,
    &VMSTAT_PAGE_SIZE,
];

// macmon

pub static MACMON_ALL_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_all_power_watts", "Total power consumption in Watts.");
pub static MACMON_ANE_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_ane_power_watts", "Current ANE power in Watts.");
pub static MACMON_CPU_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_cpu_power_watts", "Current CPU power in Watts.");
pub static MACMON_GPU_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_gpu_power_watts", "Current GPU power in Watts.");
pub static MACMON_GPU_RAM_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_gpu_ram_power_watts", "Current GPU RAM power in Watts.");
pub static MACMON_RAM_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_ram_power_watts", "Current RAM power in Watts.");
pub static MACMON_SYS_POWER: MetricDescriptor =
    MetricDescriptor::gauge("macmon_sys_power_watts", "Current system power in Watts.");
pub static MACMON_CPU_TEMPERATURE: MetricDescriptor = MetricDescriptor::gauge(
    "macmon_cpu_temperature_celsius",
    "Average CPU temperature in Celsius.",
);
pub static MACMON_GPU_TEMPERATURE: MetricDescriptor = MetricDescriptor::gauge(
    "macmon_gpu_temperature_celsius",
    "Average GPU temperature in Celsius.",
);
pub static MACMON_ECPU_FREQUENCY: MetricDescriptor = MetricDescriptor::gauge(
    "macmon_ecpu_frequency_megahertz",
    "Efficiency CPU frequency in Megahertz.",
);
pub static MACMON_ECPU_USAGE: MetricDescriptor =
    MetricDescriptor::gauge("macmon_ecpu_usage_percent", "Efficiency CPU usage percentage.");
pub static MACMON_PCPU_FREQUENCY: MetricDescriptor = MetricDescriptor::gauge(
    "macmon_pcpu_frequency_megahertz",
    "Performance CPU frequency in Megahertz.",
);
pub static MACMON_PCPU_USAGE: MetricDescriptor =
    MetricDescriptor::gauge("macmon_pcpu_usage_percent", "Performance CPU usage percentage.");
pub static MACMON_GPU_FREQUENCY: MetricDescriptor =
    MetricDescriptor::gauge("macmon_gpu_frequency_megahertz", "GPU frequency in Megahertz.");
pub static MACMON_GPU_USAGE: MetricDescriptor =
    MetricDescriptor::gauge("macmon_gpu_usage_percent", "GPU usage percentage.");
pub static MACMON_RAM_TOTAL: MetricDescriptor =
    MetricDescriptor::gauge("macmon_memory_ram_total_bytes", "Total RAM size in bytes.");
pub static MACMON_RAM_USED: MetricDescriptor =
    MetricDescriptor::gauge("macmon_memory_ram_used_bytes", "Used RAM size in bytes.");
pub static MACMON_SWAP_TOTAL: MetricDescriptor =
    MetricDescriptor::gauge("macmon_memory_swap_total_bytes", "Total swap size in bytes.");
pub static MACMON_SWAP_USED: MetricDescriptor =
    MetricDescriptor::gauge("macmon_memory_swap_used_bytes", "Used swap size in bytes.");

pub static MACMON_METRICS: &[&MetricDescriptor] = &[
    &MACMON_ALL_POWER,
    &MACMON_ANE_POWER,
    &MACMON_CPU_POWER,
    &MACMON_GPU_POWER,
    &MACMON_GPU_RAM_POWER,
    &MACMON_RAM_POWER,
    &MACMON_SYS_POWER,
    &MACMON_CPU_TEMPERATURE,
    &MACMON_GPU_TEMPERATURE,
    &MACMON_ECPU_FREQUENCY,
    &MACMON_ECPU_USAGE,
    &MACMON_PCPU_FREQUENCY,
    &MACMON_PCPU_USAGE,
    &MACMON_GPU_FREQUENCY,
    &MACMON_GPU_USAGE,
    &MACMON_RAM_TOTAL,
    &MACMON_RAM_USED,
    &MACMON_SWAP_TOTAL,
    &MACMON_SWAP_USED,
];

// Exporter self-metrics

pub static EXPORTER_COLLECTIONS: MetricDescriptor = MetricDescriptor::counter(
    "macsight_exporter_collections_total",
    "Number of collections run since start.",
);
pub static EXPORTER_SOURCE_FAILURES: MetricDescriptor = MetricDescriptor::counter(
    "macsight_exporter_source_failures_total",
    "Number of source invocations that produced no output.",
);
pub static EXPORTER_SAMPLES: MetricDescriptor = MetricDescriptor::counter(
    "macsight_exporter_samples_total",
    "Number of samples produced since start.",
);
pub static EXPORTER_LAST_COLLECTION: MetricDescriptor = MetricDescriptor::gauge(
    "macsight_exporter_last_collection_seconds",
    "Duration of the most recent collection in seconds.",
);

pub static EXPORTER_METRICS: &[&MetricDescriptor] = &[
    &EXPORTER_COLLECTIONS,
    &EXPORTER_SOURCE_FAILURES,
    &EXPORTER_SAMPLES,
    &EXPORTER_LAST_COLLECTION,
];
