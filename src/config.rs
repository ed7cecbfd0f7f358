//! Configuration loading
//!
//! The exporter reads a single YAML document:
//!
//! ```yaml
//! listen_port: 9814
//! targets:
//!   - name: nas01
//!     api_url: https://nas01.lan
//!     api_token: "1-abcdef"
//!     verify_ssl: false
//! ```
//!
//! Configuration problems are always fatal: the caller is expected to log the
//! error and exit before the HTTP listener binds.

use crate::error::{ExporterError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// One TrueNAS appliance to poll. `name` becomes the `host` label.
#[derive(Debug, Deserialize, Clone)]
pub struct Target {
    pub name: String,
    pub api_url: String,
    pub api_token: SecretString,
    #[serde(default)]
    pub verify_ssl: bool,
}

fn default_listen_port() -> u16 {
    9814
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ExporterError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .map_err(|e| ExporterError::Config(format!("{}: {}", path.display(), e)))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| ExporterError::Config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the rest of the exporter relies on and
    /// normalizes target URLs.
    pub fn validate(&mut self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ExporterError::Config("no targets configured".to_string()));
        }

        let mut seen = HashSet::new();
        for target in &mut self.targets {
            if target.name.trim().is_empty() {
                return Err(ExporterError::Config("target with empty name".to_string()));
            }
            if target.api_url.trim().is_empty() {
                return Err(ExporterError::Config(format!(
                    "target {} has no api_url",
                    target.name
                )));
            }
            if !seen.insert(target.name.clone()) {
                return Err(ExporterError::Config(format!(
                    "duplicate target name: {}",
                    target.name
                )));
            }
            target.api_url = target.api_url.trim().trim_end_matches('/').to_string();
        }

        Ok(())
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}
