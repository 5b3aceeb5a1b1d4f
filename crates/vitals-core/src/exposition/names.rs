//! Metric name and tag key validation.
//!
//! Rules:
//! - metric name: `[a-zA-Z_:][a-zA-Z0-9_:]*`
//! - tag key:     `[a-zA-Z_][a-zA-Z0-9_]*`

use crate::error::{Result, VitalsError};

fn valid_ident(s: &str, allow_colon: bool) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else { return false; };
    let head_ok = first.is_ascii_alphabetic() || first == '_' || (allow_colon && first == ':');
    head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || (allow_colon && c == ':'))
}

/// Validate a metric name.
pub fn validate_metric_name(name: &str) -> Result<()> {
    if valid_ident(name, true) {
        Ok(())
    } else {
        Err(VitalsError::InvalidArgument(format!("invalid metric name: {name:?}")))
    }
}

/// Validate a tag key.
pub fn validate_tag_key(key: &str) -> Result<()> {
    if valid_ident(key, false) {
        Ok(())
    } else {
        Err(VitalsError::InvalidArgument(format!("invalid tag key: {key:?}")))
    }
}
