//! TrueNAS REST API record schemas
//!
//! One struct per `/api/v2.0` endpoint the exporter reads. Every field the
//! normalizers use is optional on the wire; the accessor methods below hold
//! the default applied when a field is missing or `null`, so metric code never
//! has to deal with absent data.
//!
//! Fields are also lenient about their JSON type: a value of the wrong type
//! is coerced where the meaning is obvious (`"2"` vcpus, a float memory size,
//! a numeric state) and otherwise treated as missing. A single odd field never
//! fails the record.
//!
//! # Endpoints Covered
//!
//! - `replication` → [`ReplicationTask`]
//! - `pool` → [`Pool`]
//! - `app` → [`App`]
//! - `vm` → [`Vm`]
//! - `virt/instance` → [`VirtInstance`]

use serde::Deserialize;

const UNKNOWN: &str = "unknown";

/// Replication task from `GET /replication`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplicationTask {
    #[serde(default, deserialize_with = "lenient::any")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub transport: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub state: Option<ReplicationJobState>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub source_datasets: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub target_dataset: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub periodic_snapshot_tasks: Option<Vec<PeriodicSnapshotTask>>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplicationJobState {
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub datetime: Option<ApiDateTime>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_snapshot: Option<String>,
}

/// Mongo-style date wrapper used by the middleware: `{"$date": <epoch millis>}`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiDateTime {
    #[serde(rename = "$date", default, deserialize_with = "lenient::any")]
    pub millis: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PeriodicSnapshotTask {
    #[serde(default, deserialize_with = "lenient::any")]
    pub schedule: Option<Schedule>,
}

/// Cron-like schedule. Missing fields mean `*`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    #[serde(default, deserialize_with = "lenient::string")]
    pub minute: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hour: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dom: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dow: Option<String>,
}

impl Schedule {
    pub fn minute(&self) -> &str {
        self.minute.as_deref().unwrap_or("*")
    }

    pub fn hour(&self) -> &str {
        self.hour.as_deref().unwrap_or("*")
    }

    pub fn dom(&self) -> &str {
        self.dom.as_deref().unwrap_or("*")
    }

    pub fn month(&self) -> &str {
        self.month.as_deref().unwrap_or("*")
    }

    pub fn dow(&self) -> &str {
        self.dow.as_deref().unwrap_or("*")
    }

    /// True when the API sent `{}` or no fields at all.
    pub fn is_empty(&self) -> bool {
        self.minute.is_none()
            && self.hour.is_none()
            && self.dom.is_none()
            && self.month.is_none()
            && self.dow.is_none()
    }

    /// Five-field crontab rendering, e.g. `0 3 * * *`.
    pub fn to_cron(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.minute(),
            self.hour(),
            self.dom(),
            self.month(),
            self.dow()
        )
    }
}

impl ReplicationTask {
    pub fn id(&self) -> i64 {
        self.id.unwrap_or(0)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn direction(&self) -> &str {
        self.direction.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn transport(&self) -> &str {
        self.transport.as_deref().unwrap_or("UNKNOWN")
    }

    /// Tasks without an `enabled` flag are treated as disabled.
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn state(&self) -> &str {
        self.state
            .as_ref()
            .and_then(|s| s.state.as_deref())
            .unwrap_or("UNKNOWN")
    }

    /// Last run as epoch seconds, 0 when the task has never run.
    pub fn last_run_timestamp(&self) -> f64 {
        self.state
            .as_ref()
            .and_then(|s| s.datetime.as_ref())
            .and_then(|d| d.millis)
            .filter(|ms| *ms > 0.0)
            .map(|ms| ms / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn last_snapshot(&self) -> &str {
        self.state
            .as_ref()
            .and_then(|s| s.last_snapshot.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or("none")
    }

    /// Source datasets joined with `,`, or `unknown` when there are none.
    pub fn source(&self) -> String {
        match self.source_datasets.as_deref() {
            Some(datasets) if !datasets.is_empty() => datasets.join(","),
            _ => UNKNOWN.to_string(),
        }
    }

    pub fn target_dataset(&self) -> &str {
        self.target_dataset.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn periodic_snapshot_tasks(&self) -> &[PeriodicSnapshotTask] {
        self.periodic_snapshot_tasks.as_deref().unwrap_or_default()
    }
}

/// Storage pool from `GET /pool`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Pool {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub allocated: Option<f64>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub free: Option<f64>,
}

impl Pool {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Free space as a percentage of size, rounded to two decimals.
    /// `None` when either value is missing or the pool reports zero size.
    pub fn free_percent(&self) -> Option<f64> {
        match (self.size, self.free) {
            (Some(size), Some(free)) if size != 0.0 => {
                Some((free / size * 100.0 * 100.0).round() / 100.0)
            }
            _ => None,
        }
    }
}

/// Application from `GET /app`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct App {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub metadata: Option<AppMetadata>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppMetadata {
    #[serde(default, deserialize_with = "lenient::string")]
    pub train: Option<String>,
}

impl App {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn train(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.train.as_deref())
            .unwrap_or(UNKNOWN)
    }
}

/// Virtual machine from `GET /vm`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Vm {
    #[serde(default, deserialize_with = "lenient::any")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub status: Option<VmStatus>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub vcpus: Option<u64>,
    /// Already in MiB on this endpoint
    #[serde(default, deserialize_with = "lenient::count")]
    pub memory: Option<u64>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub autostart: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VmStatus {
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,
}

impl Vm {
    pub fn id(&self) -> i64 {
        self.id.unwrap_or(0)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn state(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.state.as_deref())
            .unwrap_or("UNKNOWN")
    }

    pub fn vcpus(&self) -> u64 {
        self.vcpus.unwrap_or(0)
    }

    pub fn memory_mb(&self) -> u64 {
        self.memory.unwrap_or(0)
    }

    pub fn autostart(&self) -> bool {
        self.autostart.unwrap_or(false)
    }
}

/// Incus container or VM from `GET /virt/instance` (TrueNAS 25.04+)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct VirtInstance {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub instance_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    /// CPU pinning/count string as configured, e.g. `"2"` or `"0-3"`
    #[serde(default)]
    pub cpu: Option<serde_json::Value>,
    /// Bytes
    #[serde(default, deserialize_with = "lenient::count")]
    pub memory: Option<u64>,
    #[serde(default, deserialize_with = "lenient::any")]
    pub autostart: Option<bool>,
}

impl VirtInstance {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn instance_type(&self) -> &str {
        self.instance_type.as_deref().unwrap_or("CONTAINER")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn cpu(&self) -> String {
        match &self.cpu {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Memory in MiB (integer division), 0 when unset.
    pub fn memory_mb(&self) -> u64 {
        self.memory.unwrap_or(0) / (1024 * 1024)
    }

    pub fn autostart(&self) -> bool {
        self.autostart.unwrap_or(false)
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any type; a mismatch becomes `None`.
    pub fn any<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// Strings as-is, numbers and booleans as their text.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Non-negative counts. Floats are truncated, numeric strings parsed.
    pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = match Value::deserialize(deserializer)? {
            Value::Number(n) => match n.as_u64() {
                Some(v) => return Ok(Some(v)),
                None => n.as_f64(),
            },
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(number
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64))
    }
}
