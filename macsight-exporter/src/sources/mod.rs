//! Data sources: one external command each, plus how to read its output.

pub mod macmon;
pub mod powermetrics;
pub mod vmstat;

use std::time::Duration;

use macsight_common::{MetricDescriptor, Sample};

use crate::config::SourcesConfig;
use crate::runner::{CommandSpec, RawCapture, SourceId};

pub use macmon::Macmon;
pub use powermetrics::Powermetrics;
pub use vmstat::VmStat;

/// A pluggable data source.
///
/// Parsing never fails: whatever cannot be read from a capture is left out
/// of the returned samples.
pub trait Source: Send + Sync {
    fn id(&self) -> SourceId;

    /// The command to run for one capture.
    fn command(&self) -> CommandSpec;

    /// Every metric this source can produce, in exposition order.
    fn descriptors(&self) -> &'static [&'static MetricDescriptor];

    /// Turn one capture into samples, in descriptor order.
    fn samples(&self, capture: &RawCapture) -> Vec<Sample>;

    /// Samples that do not depend on the capture.
    ///
    /// They are emitted every collection, including when the command fails.
    fn constant_samples(&self) -> Vec<Sample> {
        Vec::new()
    }
}

impl SourceId {
    /// Every source, in registration order.
    pub const ALL: [SourceId; 3] = [SourceId::Powermetrics, SourceId::VmStat, SourceId::Macmon];

    /// How long the command samples before it prints.
    pub fn sample_window(&self) -> Duration {
        match self {
            SourceId::Powermetrics | SourceId::Macmon => Duration::from_secs(1),
            SourceId::VmStat => Duration::ZERO,
        }
    }

    /// Timeout used when the configuration does not set one.
    pub fn default_timeout(&self) -> Duration {
        match self {
            SourceId::Powermetrics | SourceId::Macmon => Duration::from_secs(10),
            SourceId::VmStat => Duration::from_secs(5),
        }
    }
}

/// Build the enabled sources in registration order.
pub fn build_sources(config: &SourcesConfig) -> Vec<Box<dyn Source>> {
    SourceId::ALL
        .into_iter()
        .filter(|id| config.get(*id).enabled)
        .map(|id| {
            let timeout = config.get(id).timeout(id);
            let source: Box<dyn Source> = match id {
                SourceId::Powermetrics => Box::new(Powermetrics::new(timeout)),
                SourceId::VmStat => Box::new(VmStat::new(timeout)),
                SourceId::Macmon => Box::new(Macmon::new(timeout)),
            };
            source
        })
        .collect()
}
