//! Shared application state for the vitals gateway.
//!
//! The registry and the reporter are created once at startup and handed out
//! as `Arc`s; nothing here is a global.

use std::sync::Arc;

use vitals_core::error::Result;

use crate::config::VitalsConfig;
use crate::health::HealthReporter;
use crate::obs::{MetricFilter, MetricsRegistry, SystemMetrics};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    health: Arc<HealthReporter>,
    metrics: Arc<MetricsRegistry>,
}

struct AppStateInner {
    cfg: VitalsConfig,
    filter: MetricFilter,
    system: SystemMetrics,
}

impl AppState {
    /// Build state with a fresh registry (default tags from config) and a
    /// reporter holding the built-in `ping` check.
    pub fn new(cfg: VitalsConfig) -> Result<Self> {
        let metrics = MetricsRegistry::with_default_tags(cfg.metrics.tags.clone())?;
        let health = HealthReporter::new();
        health.register_flag("ping", true);
        Self::from_parts(cfg, Arc::new(health), Arc::new(metrics))
    }

    /// Build state around an existing reporter and registry.
    pub fn from_parts(
        cfg: VitalsConfig,
        health: Arc<HealthReporter>,
        metrics: Arc<MetricsRegistry>,
    ) -> Result<Self> {
        cfg.validate()?;
        let system = SystemMetrics::install(&metrics)?;
        let filter = MetricFilter::new(cfg.metrics.disabled.iter().cloned());

        tracing::info!(
            default_tags = metrics.default_tags().len(),
            disabled = cfg.metrics.disabled.len(),
            checks = health.registered().len(),
            "app state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, filter, system }),
            health,
            metrics,
        })
    }

    pub fn cfg(&self) -> &VitalsConfig {
        &self.inner.cfg
    }

    pub fn filter(&self) -> &MetricFilter {
        &self.inner.filter
    }

    pub fn system(&self) -> &SystemMetrics {
        &self.inner.system
    }

    pub fn health(&self) -> Arc<HealthReporter> {
        Arc::clone(&self.health)
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }
}
