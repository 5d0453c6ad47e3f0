//! Prometheus exporter for macOS system readings.
//!
//! Each scrape runs `powermetrics`, `vm_stat` and (optionally) `macmon`
//! once, parses their output and serves the result in the Prometheus text
//! format.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │    Runner    │──>│    Parser    │──>│    Mapper    │──>│ HTTP Server  │
//! │ (vm_stat ..) │   │  (Snapshot)  │   │  (Samples)   │   │  (/metrics)  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        ^                                                        │
//!        └──────────────────── Collector::scrape ─────────────────┘
//! ```
//!
//! # Usage
//!
//! Run the exporter binary, optionally with a configuration file:
//!
//! ```bash
//! sudo macsight-exporter --config config.json5
//! ```
//!
//! `powermetrics` only works as root; without it that source is skipped on
//! every scrape and the other sources are still reported.
//!
//! Per-core powermetrics series carry the bare core index as their label
//! (`powermetrics_cpu_frequency_hertz{core="3"}`).
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod collector;
pub mod config;
pub mod exposition;
pub mod http;
pub mod mapper;
pub mod parser;
pub mod registry;
pub mod runner;
pub mod sources;

pub use collector::{Collector, CollectorStats};
pub use config::ExporterConfig;
pub use http::HttpServer;
pub use runner::{CommandRunner, CommandSpec, ProcessRunner, RawCapture, SourceError, SourceId};
pub use sources::Source;
