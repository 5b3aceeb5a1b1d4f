use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use super::check::{CheckHandle, HealthCheck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn from_up(up: bool) -> Self {
        if up { Status::Up } else { Status::Down }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentHealth {
    pub status: Status,
}

/// Aggregate computed on every `report()`; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverallHealth {
    pub status: Status,
    /// Per-check status, ordered by check name.
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Registry of named checks.
#[derive(Default)]
pub struct HealthReporter {
    checks: DashMap<String, Arc<dyn HealthCheck>>,
}

impl HealthReporter {
    pub fn new() -> Self {
        Self { checks: DashMap::new() }
    }

    /// Add a check, replacing any previous check with the same name.
    pub fn register(&self, check: Arc<dyn HealthCheck>) {
        let name = check.name().to_string();
        if self.checks.insert(name.clone(), check).is_some() {
            tracing::warn!(check = %name, "health check replaced");
        } else {
            tracing::debug!(check = %name, "health check registered");
        }
    }

    /// Create a flag-backed check, register it, and return the owner's handle.
    pub fn register_flag(&self, name: impl Into<String>, up: bool) -> CheckHandle {
        let handle = CheckHandle::new(name, up);
        self.register(handle.as_check());
        handle
    }

    pub fn registered(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checks.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// DOWN if any check is down; UP otherwise, including when none exist.
    ///
    /// Checks are cloned out of the map before they run, so a check may call
    /// back into the reporter.
    pub fn report(&self) -> OverallHealth {
        let checks: Vec<(String, Arc<dyn HealthCheck>)> = self
            .checks
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        let components: BTreeMap<String, ComponentHealth> = checks
            .into_iter()
            .map(|(name, check)| {
                (name, ComponentHealth { status: Status::from_up(check.is_up()) })
            })
            .collect();
        let all_up = components.values().all(|c| c.status == Status::Up);
        OverallHealth { status: Status::from_up(all_up), components }
    }
}
