//! TrueNAS REST API Client
//!
//! Thin wrapper around `reqwest` for the `/api/v2.0` REST surface of one
//! TrueNAS appliance.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS GET to `{api_url}/api/v2.0/{endpoint}`
//! - **Authentication**: API key sent as a bearer token
//! - **Timeout**: fixed 10 seconds per request, surfaced as [`ExporterError::Http`]
//! - **Decoding**: the body must be a JSON array; each element is decoded on its
//!   own and an element that is not a record is logged and skipped
//! - **TLS**: with `verify_ssl: false` both certificate-chain and hostname
//!   verification are disabled (self-signed appliance certificates)
//!
//! # Example
//!
//! ```no_run
//! use truenas_health_exporter::config::Target;
//! use truenas_health_exporter::truenas::TrueNasClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let target = Target {
//!     name: "nas01".to_string(),
//!     api_url: "https://nas01.lan".to_string(),
//!     api_token: SecretString::from("your-api-key"),
//!     verify_ssl: false,
//! };
//!
//! let client = TrueNasClient::new(&target)?;
//! let pools = client.query_pools().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::Target;
use crate::error::{ExporterError, Result};
use crate::truenas::types::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for a single upstream request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST endpoints the exporter polls, relative to `/api/v2.0/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Replication,
    Pool,
    App,
    Vm,
    VirtInstance,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Replication => "replication",
            Endpoint::Pool => "pool",
            Endpoint::App => "app",
            Endpoint::Vm => "vm",
            Endpoint::VirtInstance => "virt/instance",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Client for one TrueNAS appliance.
///
/// Built once at startup and shared read-only between concurrent scrapes;
/// `reqwest::Client` pools connections internally.
pub struct TrueNasClient {
    name: String,
    base_url: String,
    token: SecretString,
    http: reqwest::Client,
}

impl TrueNasClient {
    pub fn new(target: &Target) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);

        if !target.verify_ssl {
            // Custom TLS connector for self-signed certs
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()?;
            builder = builder.use_preconfigured_tls(connector);
        }

        Ok(Self {
            name: target.name.clone(),
            base_url: target.api_url.trim_end_matches('/').to_string(),
            token: target.api_token.clone(),
            http: builder.build()?,
        })
    }

    /// Target name, used as the `host` label.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/api/v2.0/{}", self.base_url, endpoint.path())
    }

    /// GET an endpoint and decode the body as untyped JSON.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        self.get_json(endpoint).await
    }

    pub async fn query_replication_tasks(&self) -> Result<Vec<ReplicationTask>> {
        self.get_records(Endpoint::Replication).await
    }

    pub async fn query_pools(&self) -> Result<Vec<Pool>> {
        self.get_records(Endpoint::Pool).await
    }

    pub async fn query_apps(&self) -> Result<Vec<App>> {
        self.get_records(Endpoint::App).await
    }

    pub async fn query_vms(&self) -> Result<Vec<Vm>> {
        self.get_records(Endpoint::Vm).await
    }

    pub async fn query_virt_instances(&self) -> Result<Vec<VirtInstance>> {
        self.get_records(Endpoint::VirtInstance).await
    }

    async fn get_records<T>(&self, endpoint: Endpoint) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let values: Vec<Value> = self.get_json(endpoint).await?;
        Ok(decode_records(&self.name, endpoint, values))
    }

    async fn get_json<T>(&self, endpoint: Endpoint) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        debug!("GET {} ({})", url, self.name);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::Status {
                endpoint: endpoint.path().to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        debug!("{} response received from {} ({} bytes)", endpoint, self.name, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Decodes each element on its own, so one unusable element only drops itself.
fn decode_records<T>(host: &str, endpoint: Endpoint, values: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} record #{} from {}: {}", endpoint, index, host, e);
                None
            }
        })
        .collect()
}
