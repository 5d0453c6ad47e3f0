//! Integration tests for the exporter.
//!
//! These drive the full pipeline (runner, parsers, mapper, collector and
//! HTTP endpoint) with captures recorded on real machines.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use macsight_common::{MetricDescriptor, Sample};
use macsight_exporter::config::{SourceConfig, SourcesConfig};
use macsight_exporter::registry::*;
use macsight_exporter::sources::build_sources;
use macsight_exporter::{
    Collector, CommandRunner, CommandSpec, HttpServer, RawCapture, SourceError, SourceId,
};
use tokio::sync::watch;

const POWERMETRICS: &str = include_str!("fixtures/powermetrics.txt");
const VM_STAT: &str = include_str!("fixtures/vm_stat.txt");
const MACMON: &str = include_str!("fixtures/macmon.jsonl");

/// Serves recorded captures. Sources without a capture fail to spawn.
#[derive(Default)]
struct FakeRunner {
    captures: HashMap<SourceId, String>,
}

impl FakeRunner {
    fn with(mut self, id: SourceId, stdout: &str) -> Self {
        self.captures.insert(id, stdout.to_string());
        self
    }

    fn all() -> Self {
        Self::default()
            .with(SourceId::Powermetrics, POWERMETRICS)
            .with(SourceId::VmStat, VM_STAT)
            .with(SourceId::Macmon, MACMON)
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, source: SourceId, spec: CommandSpec) -> Result<RawCapture, SourceError> {
        match self.captures.get(&source) {
            Some(stdout) => Ok(RawCapture::from_output(source, stdout.clone())),
            None => Err(SourceError::Spawn {
                program: spec.program,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            }),
        }
    }
}

fn all_sources() -> SourcesConfig {
    SourcesConfig {
        macmon: SourceConfig::enabled(),
        ..Default::default()
    }
}

fn collector(runner: FakeRunner, config: &SourcesConfig) -> Collector<FakeRunner> {
    Collector::new(runner, build_sources(config))
}

fn values(samples: &[Sample], descriptor: &MetricDescriptor) -> Vec<(String, f64)> {
    samples
        .iter()
        .filter(|s| s.is_for(descriptor))
        .map(|s| (s.label_values.join(","), s.value))
        .collect()
}

/// Extract `name{labels} value` pairs from an exposition body.
fn parse_exposition(body: &str) -> Vec<(&str, f64)> {
    body.lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .filter_map(|line| {
            let (series, value) = line.rsplit_once(' ')?;
            Some((series, value.parse().ok()?))
        })
        .collect()
}

#[tokio::test]
async fn test_powermetrics_capture() {
    let config = SourcesConfig {
        vmstat: SourceConfig::disabled(),
        ..Default::default()
    };
    let samples = collector(FakeRunner::all(), &config).collect().await;

    assert_eq!(samples.len(), 16);
    assert_eq!(
        values(&samples, &POWERMETRICS_CPU_FREQUENCY),
        vec![
            ("0".to_string(), 1_214_000_000.0),
            ("1".to_string(), 1_198_000_000.0),
            ("4".to_string(), 2_412_000_000.0),
            ("5".to_string(), 0.0),
        ]
    );
    assert_eq!(
        values(&samples, &POWERMETRICS_CPU_POWER),
        vec![(String::new(), 1339.0)]
    );
    assert_eq!(
        values(&samples, &POWERMETRICS_GPU_POWER),
        vec![(String::new(), 6.0)]
    );
    assert_eq!(values(&samples, &POWERMETRICS_CPU_IDLE_RESIDENCY).len(), 4);
    assert_eq!(
        values(&samples, &POWERMETRICS_CPU_IDLE_RESIDENCY)[3],
        ("5".to_string(), 100.0)
    );
    assert_eq!(
        values(&samples, &POWERMETRICS_GPU_ACTIVE_RESIDENCY),
        vec![(String::new(), 2.25)]
    );
    assert_eq!(
        values(&samples, &POWERMETRICS_GPU_IDLE_RESIDENCY),
        vec![(String::new(), 97.75)]
    );
}

#[tokio::test]
async fn test_vm_stat_capture() {
    let config = SourcesConfig {
        powermetrics: SourceConfig::disabled(),
        ..Default::default()
    };
    let samples = collector(FakeRunner::all(), &config).collect().await;

    let parsed: Vec<_> = samples
        .iter()
        .filter(|s| !s.is_for(&VMSTAT_PAGE_SIZE))
        .collect();
    assert_eq!(parsed.len(), 21);
    assert_eq!(
        values(&samples, &VMSTAT_PAGES_WIRED),
        vec![(String::new(), 120233.0)]
    );
    assert_eq!(
        values(&samples, &VMSTAT_FAULTS),
        vec![(String::new(), 862358720.0)]
    );
    assert_eq!(
        values(&samples, &VMSTAT_PAGES_COMPRESSOR),
        vec![(String::new(), 412230.0)]
    );
}

#[tokio::test]
async fn test_macmon_capture_uses_last_record() {
    let config = SourcesConfig {
        powermetrics: SourceConfig::disabled(),
        vmstat: SourceConfig::disabled(),
        macmon: SourceConfig::enabled(),
    };
    let samples = collector(FakeRunner::all(), &config).collect().await;

    assert_eq!(samples.len(), 19);
    assert_eq!(
        values(&samples, &MACMON_SYS_POWER),
        vec![(String::new(), 6.1)]
    );
    assert_eq!(
        values(&samples, &MACMON_ECPU_FREQUENCY),
        vec![(String::new(), 1181.0)]
    );
}

#[tokio::test]
async fn test_macmon_bad_line_then_valid_line() {
    let config = SourcesConfig {
        powermetrics: SourceConfig::disabled(),
        vmstat: SourceConfig::disabled(),
        macmon: SourceConfig::enabled(),
    };
    let capture = format!("{{\"cpu_power\": \n{}", MACMON.lines().next().unwrap());
    let runner = FakeRunner::default().with(SourceId::Macmon, &capture);

    let samples = collector(runner, &config).collect().await;

    assert_eq!(samples.len(), 19);
    assert_eq!(
        values(&samples, &MACMON_CPU_POWER),
        vec![(String::new(), 0.39)]
    );
}

#[tokio::test]
async fn test_failing_source_does_not_affect_others() {
    let runner = FakeRunner::default().with(SourceId::VmStat, VM_STAT);
    let collector = collector(runner, &all_sources());

    let samples = collector.collect().await;

    assert!(samples.iter().all(|s| s.descriptor.name.starts_with("vmstat_")));
    assert!(samples.iter().any(|s| s.is_for(&VMSTAT_PAGES_FREE)));
    assert_eq!(collector.stats().source_failures, 2);
}

#[tokio::test]
async fn test_missing_field_is_omitted() {
    let capture: String = VM_STAT
        .lines()
        .filter(|line| !line.starts_with("Pages purgeable"))
        .map(|line| format!("{line}\n"))
        .collect();
    let config = SourcesConfig {
        powermetrics: SourceConfig::disabled(),
        ..Default::default()
    };
    let runner = FakeRunner::default().with(SourceId::VmStat, &capture);

    let samples = collector(runner, &config).collect().await;

    assert!(!samples.iter().any(|s| s.is_for(&VMSTAT_PAGES_PURGEABLE)));
    assert!(samples.iter().any(|s| s.is_for(&VMSTAT_PAGES_PURGED)));
}

#[tokio::test]
async fn test_collections_are_repeatable() {
    let collector = collector(FakeRunner::all(), &all_sources());

    let first = collector.collect().await;
    let second = collector.collect().await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_samples_grouped_by_source_then_descriptor() {
    let collector = collector(FakeRunner::all(), &all_sources());
    let samples = collector.collect().await;

    let order: Vec<_> = collector.descriptors().iter().map(|d| d.name).collect();
    let mut positions = samples.iter().map(|s| {
        order
            .iter()
            .position(|name| *name == s.descriptor.name)
            .unwrap()
    });

    let mut previous = positions.next().unwrap();
    for position in positions {
        assert!(position >= previous);
        previous = position;
    }
}

#[tokio::test]
async fn test_scrape_exposition() {
    let collector = collector(FakeRunner::all(), &all_sources());
    let body = collector.scrape().await;

    // Declared but never populated, so the family is left out.
    assert!(!body.contains("powermetrics_cpu_temperature_celsius"));
    assert!(body.contains("# TYPE vmstat_faults_total counter\n"));

    let series = parse_exposition(&body);
    let lookup: HashMap<_, _> = series.iter().copied().collect();
    assert_eq!(series.len(), lookup.len(), "duplicate series in exposition");

    assert_eq!(
        lookup.get("powermetrics_cpu_frequency_hertz{core=\"4\"}"),
        Some(&2_412_000_000.0)
    );
    assert_eq!(lookup.get("powermetrics_cpu_power_milliwatts"), Some(&1339.0));
    assert_eq!(lookup.get("vmstat_pages_free_count"), Some(&3624.0));
    assert_eq!(lookup.get("macmon_memory_ram_total_bytes"), Some(&17179869184.0));
    assert_eq!(lookup.get("macsight_exporter_collections_total"), Some(&1.0));
    assert_eq!(lookup.get("macsight_exporter_source_failures_total"), Some(&0.0));
}

#[tokio::test]
async fn test_http_end_to_end() {
    let collector = Arc::new(collector(FakeRunner::all(), &all_sources()));

    // Bind to an ephemeral port, then hand it to the server.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = probe.local_addr().unwrap();
    drop(probe);

    let server = HttpServer::new(Arc::clone(&collector), addr, "/metrics".to_string());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server_task = tokio::spawn(server.run(shutdown_rx));

    let body = fetch(addr, "/metrics").await;
    assert!(body.starts_with("HTTP/1.1 200"));
    assert!(body.contains("text/plain; version=0.0.4"));
    assert!(body.contains("vmstat_pages_active_count 245632\n"));

    let health = fetch(addr, "/health").await;
    assert!(health.contains("healthy"));

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server_task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(collector.stats().collections, 1);
}

/// Minimal HTTP/1.1 GET, retried while the server is still binding.
async fn fetch(addr: SocketAddr, path: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = None;
    for _ in 0..50 {
        match tokio::net::TcpStream::connect(addr).await {
            Ok(s) => {
                stream = Some(s);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(20)).await,
        }
    }
    let mut stream = stream.expect("server did not start");

    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}
