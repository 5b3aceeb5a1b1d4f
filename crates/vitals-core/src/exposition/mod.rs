//! Text exposition format helpers.
//!
//! This module hosts the pieces of the line-oriented metrics format that do not
//! depend on any registry:
//! - Names: metric name and tag key validation.
//! - Text: value formatting, tag value escaping, and single-line rendering.
//!
//! Everything here is panic-free: invalid input is reported as `VitalsError`
//! so a bad metric name coming from a handler never takes the process down.

pub mod names;
pub mod text;

pub use names::{validate_metric_name, validate_tag_key};
pub use text::{escape_tag_value, format_line, format_value, write_line};
