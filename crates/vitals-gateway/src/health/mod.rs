//! Health aggregation.
//!
//! Subsystems own their checks and flip them; the reporter only reads them
//! when `/health` is requested.

pub mod check;
pub mod reporter;

pub use check::{CheckHandle, HealthCheck};
pub use reporter::{ComponentHealth, HealthReporter, OverallHealth, Status};
