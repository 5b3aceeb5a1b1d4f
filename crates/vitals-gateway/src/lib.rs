//! vitals gateway library entry.
//!
//! This crate wires the config loader, health reporter, metrics registry and
//! the operational HTTP endpoints into one service. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod health;
pub mod obs;
pub mod ops;
pub mod router;
