use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Deserialize;
use vitals_core::error::{Result, VitalsError};
use vitals_core::exposition::{validate_metric_name, validate_tag_key};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalsConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub health: HealthSection,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            health: HealthSection::default(),
        }
    }
}

impl VitalsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VitalsError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            VitalsError::BadConfig(format!(
                "server.listen {:?} is not a socket address: {e}",
                self.listen
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Tags added to every rendered series (e.g. `application`, `env`).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Metric name prefixes hidden from the HTTP endpoints.
    #[serde(default = "default_disabled")]
    pub disabled: Vec<String>,

    /// Count requests served by the router.
    #[serde(default = "default_true")]
    pub http_requests: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            tags: BTreeMap::new(),
            disabled: default_disabled(),
            http_requests: true,
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        for key in self.tags.keys() {
            validate_tag_key(key).map_err(|_| {
                VitalsError::BadConfig(format!("metrics.tags has invalid key {key:?}"))
            })?;
        }
        for prefix in &self.disabled {
            // A prefix must itself be a valid (partial) metric name.
            validate_metric_name(prefix).map_err(|_| {
                VitalsError::BadConfig(format!("metrics.disabled has invalid entry {prefix:?}"))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthSection {
    /// Include per-check status in `/health`.
    #[serde(default)]
    pub show_details: bool,
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_disabled() -> Vec<String> {
    vec!["http_server_requests".into()]
}
fn default_true() -> bool {
    true
}
