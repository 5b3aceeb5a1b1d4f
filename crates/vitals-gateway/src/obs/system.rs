//! Built-in process and host gauges.
//!
//! - `system_cpu_count`: logical CPUs available to the process
//! - `process_start_time_seconds`: unix time the registry was set up
//! - `process_uptime_seconds`: refreshed before each render
//! - `process_resident_memory_bytes`, `process_virtual_memory_bytes`: read
//!   from `/proc/self/statm` before each render; stay 0 where that is missing

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use vitals_core::error::Result;

use super::metrics::MetricsRegistry;

pub const CPU_COUNT: &str = "system_cpu_count";
pub const START_TIME: &str = "process_start_time_seconds";
pub const UPTIME: &str = "process_uptime_seconds";
pub const RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
pub const VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";

// statm reports pages.
const PAGE_SIZE: u64 = 4096;

/// Process memory in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
}

impl MemoryUsage {
    /// Parse `/proc/self/statm` content: `size resident shared ...` in pages.
    pub fn from_statm(content: &str) -> Option<Self> {
        let mut parts = content.split_whitespace();
        let vms_pages = parts.next()?.parse::<u64>().ok()?;
        let rss_pages = parts.next()?.parse::<u64>().ok()?;
        Some(Self {
            resident_bytes: rss_pages * PAGE_SIZE,
            virtual_bytes: vms_pages * PAGE_SIZE,
        })
    }

    /// Current usage, or `None` when the platform does not expose statm.
    pub fn capture() -> Option<Self> {
        std::fs::read_to_string("/proc/self/statm").ok().and_then(|s| Self::from_statm(&s))
    }
}

#[derive(Debug)]
pub struct SystemMetrics {
    started: Instant,
}

impl SystemMetrics {
    /// Register the gauges on `registry` and start the uptime clock.
    pub fn install(registry: &MetricsRegistry) -> Result<Self> {
        let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let start_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        registry.set_gauge(CPU_COUNT, &[], cpus as f64)?;
        registry.set_gauge(START_TIME, &[], start_unix)?;
        registry.set_gauge(UPTIME, &[], 0.0)?;
        let memory = MemoryUsage::capture().unwrap_or_default();
        set_memory(registry, memory)?;
        tracing::debug!(cpus, resident = memory.resident_bytes, "system metrics installed");

        Ok(Self { started: Instant::now() })
    }

    pub fn refresh(&self, registry: &MetricsRegistry) -> Result<()> {
        registry.set_gauge(UPTIME, &[], self.started.elapsed().as_secs_f64())?;
        if let Some(memory) = MemoryUsage::capture() {
            set_memory(registry, memory)?;
        }
        Ok(())
    }
}

fn set_memory(registry: &MetricsRegistry, memory: MemoryUsage) -> Result<()> {
    registry.set_gauge(RESIDENT_MEMORY, &[], memory.resident_bytes as f64)?;
    registry.set_gauge(VIRTUAL_MEMORY, &[], memory.virtual_bytes as f64)
}
