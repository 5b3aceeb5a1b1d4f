//! vitals core: transport-agnostic error types and exposition primitives.
//!
//! This crate defines the error surface and the text exposition format shared
//! by the gateway and any tooling that needs to produce or check metric lines.
//! It intentionally carries no transport or runtime dependencies so it can be
//! reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `VitalsError`/`Result` so a bad metric
//! name or tag never crashes a serving process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;

/// Shared result type.
pub use error::{ClientCode, Result, VitalsError};
