//! TrueNAS Health Exporter
//!
//! A Prometheus exporter that polls one or more TrueNAS appliances over their
//! REST API and reports replication, pool, app, VM and Incus instance health.
//!
//! # Overview
//!
//! Every scrape of `/metrics` contacts every configured host, normalizes the JSON
//! records into gauges and renders them in the Prometheus text format. A host or
//! endpoint that is down only removes its own samples; the scrape still succeeds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐                     ┌──────────────────────────┐
//! │  TrueNAS A  │ ◄── HTTPS GET ────  │  Exporter                │
//! └─────────────┘   /api/v2.0/...     │  ┌────────┐ ┌──────────┐ │      HTTP      ┌────────────┐
//! ┌─────────────┐                     │  │ Client │→│Collectors│ │ ◄────────────► │ Prometheus │
//! │  TrueNAS B  │ ◄── HTTPS GET ────  │  └────────┘ └──────────┘ │   /metrics     └────────────┘
//! └─────────────┘                     │        Encoder           │
//!                                     └──────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`truenas`] - REST client and API record schemas
//! - [`collectors`] - Per-domain normalizers producing metric families
//! - [`metrics`] - Metric model and text exposition encoder
//! - [`server`] - HTTP server
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use truenas_health_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/example.yaml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod truenas;
