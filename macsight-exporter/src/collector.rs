//! Collection orchestrator: runs every source once per scrape.

use std::time::{Duration, Instant};

use macsight_common::{MetricDescriptor, Sample};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::SourcesConfig;
use crate::exposition;
use crate::registry::{
    EXPORTER_COLLECTIONS, EXPORTER_LAST_COLLECTION, EXPORTER_METRICS, EXPORTER_SAMPLES,
    EXPORTER_SOURCE_FAILURES,
};
use crate::runner::{CommandRunner, ProcessRunner, SourceId};
use crate::sources::{Source, build_sources};

/// Collector statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectorStats {
    /// Collections run since start.
    pub collections: u64,
    /// Source invocations that returned an error.
    pub source_failures: u64,
    /// Samples produced across all collections.
    pub samples: u64,
    /// Duration of the most recent collection.
    pub last_collection: Duration,
}

impl CollectorStats {
    /// Express the statistics as exporter self-metrics.
    pub fn to_samples(&self) -> Vec<Sample> {
        [
            (&EXPORTER_COLLECTIONS, self.collections as f64),
            (&EXPORTER_SOURCE_FAILURES, self.source_failures as f64),
            (&EXPORTER_SAMPLES, self.samples as f64),
            (&EXPORTER_LAST_COLLECTION, self.last_collection.as_secs_f64()),
        ]
        .into_iter()
        .filter_map(|(descriptor, value)| Sample::new(descriptor, value))
        .collect()
    }
}

/// Runs the registered sources and aggregates their samples.
///
/// Collections are serialized: a scrape arriving while another one runs
/// waits for it instead of spawning a second set of commands.
pub struct Collector<R: CommandRunner = ProcessRunner> {
    runner: R,
    sources: Vec<Box<dyn Source>>,
    /// Held for the whole of a collection.
    collecting: Mutex<()>,
    stats: RwLock<CollectorStats>,
}

impl Collector<ProcessRunner> {
    /// Create a collector that runs real commands for the enabled sources.
    pub fn from_config(config: &SourcesConfig) -> Self {
        Self::new(ProcessRunner, build_sources(config))
    }
}

impl<R: CommandRunner> Collector<R> {
    pub fn new(runner: R, sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            runner,
            sources,
            collecting: Mutex::new(()),
            stats: RwLock::new(CollectorStats::default()),
        }
    }

    /// Identifiers of the registered sources, in collection order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Every descriptor the registered sources can produce, in exposition order.
    pub fn descriptors(&self) -> Vec<&'static MetricDescriptor> {
        self.sources
            .iter()
            .flat_map(|s| s.descriptors().iter().copied())
            .collect()
    }

    /// Run every source once and return the samples in source order.
    ///
    /// A failing source is logged and contributes only its constant samples.
    pub async fn collect(&self) -> Vec<Sample> {
        let _guard = self.collecting.lock().await;
        let started = Instant::now();

        let mut samples = Vec::new();
        let mut failures = 0u64;

        for source in &self.sources {
            let id = source.id();

            match self.runner.run(id, source.command()).await {
                Ok(capture) => {
                    let produced = source.samples(&capture);
                    trace!(source = %id, samples = produced.len(), "Parsed capture");
                    samples.extend(produced);
                }
                Err(e) => {
                    failures += 1;
                    warn!(source = %id, error = %e, "Source failed, skipping");
                }
            }

            samples.extend(source.constant_samples());
        }

        let elapsed = started.elapsed();
        {
            let mut stats = self.stats.write();
            stats.collections += 1;
            stats.source_failures += failures;
            stats.samples += samples.len() as u64;
            stats.last_collection = elapsed;
        }

        debug!(
            samples = samples.len(),
            failures,
            elapsed_ms = elapsed.as_millis() as u64,
            "Collection complete"
        );

        samples
    }

    /// Get collector statistics.
    pub fn stats(&self) -> CollectorStats {
        self.stats.read().clone()
    }

    /// Collect and render source metrics followed by exporter self-metrics.
    pub async fn scrape(&self) -> String {
        let samples = self.collect().await;
        let mut output = exposition::render(&self.descriptors(), &samples);
        output.push_str(&exposition::render(EXPORTER_METRICS, &self.stats().to_samples()));
        output
    }
}
