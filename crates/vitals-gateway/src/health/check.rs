use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named up/down probe. Must be cheap and non-blocking.
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;
    fn is_up(&self) -> bool;
}

struct FlagCheck {
    name: String,
    up: AtomicBool,
}

impl HealthCheck for FlagCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_up(&self) -> bool {
        self.up.load(Ordering::Relaxed)
    }
}

/// Flag-backed check held by the subsystem that owns it.
#[derive(Clone)]
pub struct CheckHandle {
    inner: Arc<FlagCheck>,
}

impl CheckHandle {
    pub fn new(name: impl Into<String>, up: bool) -> Self {
        Self {
            inner: Arc::new(FlagCheck { name: name.into(), up: AtomicBool::new(up) }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn set_up(&self, up: bool) {
        let prev = self.inner.up.swap(up, Ordering::Relaxed);
        if prev != up {
            tracing::info!(check = %self.inner.name, up, "health check changed");
        }
    }

    pub fn is_up(&self) -> bool {
        self.inner.is_up()
    }

    /// Shared view for the reporter.
    pub fn as_check(&self) -> Arc<dyn HealthCheck> {
        self.inner.clone()
    }
}
