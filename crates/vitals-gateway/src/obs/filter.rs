//! Exposition-time filter for disabled metrics.
//!
//! The registry records everything; this filter only decides what the HTTP
//! endpoints show. Entries match whole `_`-separated name segments, so
//! `http_server_requests` hides `http_server_requests_total` but `process_up`
//! does not hide `process_uptime_seconds`.

#[derive(Debug, Clone, Default)]
pub struct MetricFilter {
    disabled: Vec<String>,
}

impl MetricFilter {
    pub fn new<I, S>(disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { disabled: disabled.into_iter().map(Into::into).collect() }
    }

    pub fn allows(&self, name: &str) -> bool {
        !self.disabled.iter().any(|p| {
            name.strip_prefix(p.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('_'))
        })
    }

    /// Same as [`allows`](Self::allows) for a rendered line.
    pub fn allows_line(&self, line: &str) -> bool {
        let end = line.find(['{', ' ']).unwrap_or(line.len());
        self.allows(&line[..end])
    }
}
