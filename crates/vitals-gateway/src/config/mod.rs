//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use vitals_core::error::{Result, VitalsError};

pub use schema::{HealthSection, MetricsSection, ServerSection, VitalsConfig};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "VITALS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "vitals.yaml";

/// Path from `VITALS_CONFIG`, or `vitals.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<VitalsConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VitalsError::BadConfig(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<VitalsConfig> {
    let cfg: VitalsConfig = serde_yaml::from_str(s)
        .map_err(|e| VitalsError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
