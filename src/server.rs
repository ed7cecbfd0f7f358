//! HTTP Server
//!
//! Axum-based front end. There is no background collection loop: every
//! `/metrics` request fans out to all configured TrueNAS hosts and renders the
//! result on the spot, so nothing is cached between scrapes.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links and the number of monitored hosts
//! - `GET /metrics` - Prometheus metrics in text format (always 200)
//! - `GET /health`, `GET /healthz` - Liveness, `{"status":"ok"}` regardless of upstream health
//! - anything else - 404 with an empty body
//!
//! # Error Handling
//!
//! Upstream failures only remove samples from the response; they never fail the
//! scrape. If the client disconnects mid-scrape the handler future is dropped,
//! cancelling any outstanding upstream requests.

use crate::collectors;
use crate::config::Config;
use crate::error::{ExporterError, Result};
use crate::metrics;
use crate::truenas::TrueNasClient;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const METRICS_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    clients: Arc<Vec<TrueNasClient>>,
}

impl AppState {
    /// Builds one API client per configured target.
    pub fn new(config: &Config) -> Result<Self> {
        let clients = config
            .targets
            .iter()
            .map(TrueNasClient::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients: Arc::new(clients),
        })
    }

    pub fn target_count(&self) -> usize {
        self.clients.len()
    }

    /// Runs one complete scrape and returns the exposition document.
    pub async fn render_metrics(&self) -> String {
        let snapshots = collectors::scrape(&self.clients).await;
        let families = collectors::collect_all(&snapshots, collectors::unix_now());
        metrics::encode(&families)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/healthz", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;
    let app = router(state);

    // Start the server
    let addr = format!("{}:{}", config.listen_addr, config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>TrueNAS Exporter</title></head>
<body>
<h1>TrueNAS Exporter v{}</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health Check</a></p>
<p>Monitoring {} TrueNAS host(s)</p>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.target_count()
    ))
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let body = state.render_metrics().await;
    debug!(
        "Scraped {} host(s) in {:.3}s",
        state.target_count(),
        started.elapsed().as_secs_f64()
    );

    ([(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)], body)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
