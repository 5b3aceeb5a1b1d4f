//! Metrics registry for counters and gauges with dynamic tags.
//!
//! Entries live in a `DashMap` keyed by (name, sorted tag list), so mutations
//! on unrelated metrics never contend on one lock. Each value is an `f64`
//! stored as bits in an `AtomicU64`: counters add with a CAS loop, gauges
//! store. Default tags are folded into the key when a series is looked up, so
//! the key is exactly what gets rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use vitals_core::error::{Result, VitalsError};
use vitals_core::exposition::{self, validate_metric_name, validate_tag_key};

/// Sorted, de-duplicated tag list.
pub type TagList = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct MetricKey {
    name: String,
    /// Own tags merged over the registry defaults.
    tags: TagList,
}

impl MetricKey {
    fn new(name: &str, tags: &[(&str, &str)], defaults: &[(String, String)]) -> Result<Self> {
        validate_metric_name(name)?;
        let mut own: Vec<(&str, &str)> = Vec::with_capacity(tags.len());
        for &(k, v) in tags {
            validate_tag_key(k)?;
            own.push((k, v));
        }
        own.sort();
        if let Some(w) = own.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(VitalsError::InvalidArgument(format!(
                "duplicate tag key {:?} on metric {name}",
                w[0].0
            )));
        }
        Ok(Self { name: name.to_string(), tags: merge_tags(defaults, &own) })
    }
}

/// One (name, tag-set) series.
struct Metric {
    key: MetricKey,
    kind: MetricKind,
    bits: AtomicU64,
}

impl Metric {
    fn new(key: MetricKey, kind: MetricKind) -> Self {
        Self { key, kind, bits: AtomicU64::new(0f64.to_bits()) }
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn store(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }

    /// Add `delta`; leaves the value untouched and returns false if the sum
    /// would not be finite.
    fn add(&self, delta: f64) -> bool {
        self.bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |b| {
                let sum = f64::from_bits(b) + delta;
                sum.is_finite().then(|| sum.to_bits())
            })
            .is_ok()
    }
}

/// Current value of one series, tags already merged with the defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub kind: MetricKind,
    pub tags: TagList,
    pub value: f64,
}

/// Process-wide registry of counters and gauges.
///
/// Held behind an `Arc` by the application state and handed to whoever needs
/// to record; there is no global instance.
#[derive(Default)]
pub struct MetricsRegistry {
    defaults: TagList,
    map: DashMap<MetricKey, Arc<Metric>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry whose series carry `defaults` unless they set the same
    /// tag key themselves. A key given twice keeps its first value.
    pub fn with_default_tags<I, K, V>(defaults: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut list: TagList = Vec::new();
        for (k, v) in defaults {
            let k = k.into();
            validate_tag_key(&k)?;
            list.push((k, v.into()));
        }
        // Stable sort by key only, so dedup keeps the first occurrence.
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list.dedup_by(|a, b| a.0 == b.0);
        Ok(Self { defaults: list, map: DashMap::new() })
    }

    pub fn default_tags(&self) -> &[(String, String)] {
        &self.defaults
    }

    /// Increment a counter by 1.
    pub fn inc(&self, name: &str, tags: &[(&str, &str)]) -> Result<()> {
        self.increment(name, tags, 1.0)
    }

    /// Add `delta` to a counter, creating it at 0 if absent.
    ///
    /// A negative or non-finite delta is rejected and nothing is created. A
    /// delta that would overflow the counter to infinity is rejected and the
    /// counter keeps its value.
    pub fn increment(&self, name: &str, tags: &[(&str, &str)], delta: f64) -> Result<()> {
        if !(delta.is_finite() && delta >= 0.0) {
            tracing::warn!(metric = %name, delta, "rejected counter increment");
            return Err(VitalsError::InvalidArgument(format!(
                "counter {name} delta must be a finite value >= 0, got {delta}"
            )));
        }
        let metric = self.series(self.key(name, tags)?, MetricKind::Counter)?;
        if !metric.add(delta) {
            tracing::warn!(metric = %name, delta, "rejected counter overflow");
            return Err(VitalsError::InvalidArgument(format!(
                "counter {name} would overflow adding {delta}"
            )));
        }
        Ok(())
    }

    /// Set a gauge, creating it if absent.
    pub fn set_gauge(&self, name: &str, tags: &[(&str, &str)], value: f64) -> Result<()> {
        let metric = self.series(self.key(name, tags)?, MetricKind::Gauge)?;
        metric.store(value);
        Ok(())
    }

    /// Current value of a series, or `None` when it was never registered.
    pub fn value(&self, name: &str, tags: &[(&str, &str)]) -> Option<f64> {
        let key = self.key(name, tags).ok()?;
        self.map.get(&key).map(|m| m.value().load())
    }

    /// Number of distinct (name, tag-set) series.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All series of one metric name, ordered by tag list.
    pub fn snapshot(&self, name: &str) -> Vec<Sample> {
        let mut series: Vec<Arc<Metric>> = self
            .map
            .iter()
            .filter(|e| e.key().name == name)
            .map(|e| Arc::clone(e.value()))
            .collect();
        series.sort_by(|a, b| a.key.cmp(&b.key));

        series
            .iter()
            .map(|m| Sample { kind: m.kind, tags: m.key.tags.clone(), value: m.load() })
            .collect()
    }

    /// Lines in exposition format, one per series, ordered by (name, tags).
    ///
    /// The series set is captured when this is called; each value is read
    /// when its line is produced. Every call starts over from current state.
    pub fn render(&self) -> MetricLines {
        let mut series: Vec<Arc<Metric>> =
            self.map.iter().map(|e| Arc::clone(e.value())).collect();
        series.sort_by(|a, b| a.key.cmp(&b.key));
        MetricLines { series: series.into_iter() }
    }

    /// Render every line followed by `\n`.
    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        for line in self.render() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn key(&self, name: &str, tags: &[(&str, &str)]) -> Result<MetricKey> {
        MetricKey::new(name, tags, &self.defaults)
    }

    fn series(&self, key: MetricKey, kind: MetricKind) -> Result<Arc<Metric>> {
        let metric = match self.map.get(&key) {
            Some(m) => Arc::clone(m.value()),
            None => {
                let entry = self
                    .map
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Metric::new(key, kind)));
                Arc::clone(entry.value())
            }
        };
        if metric.kind != kind {
            return Err(VitalsError::InvalidArgument(format!(
                "metric {} is a {}, not a {}",
                metric.key.name,
                metric.kind.as_str(),
                kind.as_str()
            )));
        }
        Ok(metric)
    }
}

/// Lazy line iterator returned by [`MetricsRegistry::render`].
pub struct MetricLines {
    series: std::vec::IntoIter<Arc<Metric>>,
}

impl Iterator for MetricLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let m = self.series.next()?;
        Some(exposition::format_line(&m.key.name, &m.key.tags, m.load()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.series.size_hint()
    }
}

impl ExactSizeIterator for MetricLines {}

/// Merge sorted `own` tags over sorted `defaults`; `own` wins on equal keys.
fn merge_tags(defaults: &[(String, String)], own: &[(&str, &str)]) -> TagList {
    let mut out = Vec::with_capacity(defaults.len() + own.len());
    let (mut d, mut o) = (defaults.iter().peekable(), own.iter().peekable());
    loop {
        match (d.peek(), o.peek()) {
            (Some(dk), Some(ok)) => {
                if dk.0.as_str() < ok.0 {
                    out.push((dk.0.clone(), dk.1.clone()));
                    d.next();
                } else {
                    if dk.0 == ok.0 {
                        d.next();
                    }
                    out.push((ok.0.to_string(), ok.1.to_string()));
                    o.next();
                }
            }
            (Some(dk), None) => {
                out.push((dk.0.clone(), dk.1.clone()));
                d.next();
            }
            (None, Some(ok)) => {
                out.push((ok.0.to_string(), ok.1.to_string()));
                o.next();
            }
            (None, None) => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_scenario() {
        let reg = MetricsRegistry::new();
        for _ in 0..3 {
            reg.increment("requests_total", &[("method", "GET")], 1.0).unwrap();
        }
        let lines: Vec<String> = reg.render().collect();
        assert_eq!(lines, vec![r#"requests_total{method="GET"} 3"#.to_string()]);
    }

    #[test]
    fn counter_sums_deltas() {
        let reg = MetricsRegistry::new();
        let deltas = [0.0, 1.5, 2.0, 0.25, 10.0];
        for d in deltas {
            reg.increment("bytes_total", &[], d).unwrap();
        }
        assert_eq!(reg.value("bytes_total", &[]), Some(deltas.iter().sum()));
    }

    #[test]
    fn negative_delta_leaves_counter_unchanged() {
        let reg = MetricsRegistry::new();
        reg.increment("jobs_total", &[("queue", "a")], 4.0).unwrap();

        let err = reg.increment("jobs_total", &[("queue", "a")], -1.0).unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_ARGUMENT");
        assert_eq!(reg.value("jobs_total", &[("queue", "a")]), Some(4.0));
    }

    #[test]
    fn rejected_delta_does_not_create_series() {
        let reg = MetricsRegistry::new();
        assert!(reg.increment("jobs_total", &[], -1.0).is_err());
        assert!(reg.increment("jobs_total", &[], f64::NAN).is_err());
        assert!(reg.increment("jobs_total", &[], f64::INFINITY).is_err());
        assert!(reg.is_empty());
        assert_eq!(reg.render().count(), 0);
    }

    #[test]
    fn gauge_set_is_idempotent() {
        let reg = MetricsRegistry::new();
        reg.set_gauge("pool_size", &[], 7.0).unwrap();
        let once = reg.render_to_string();
        reg.set_gauge("pool_size", &[], 7.0).unwrap();
        assert_eq!(reg.render_to_string(), once);
        assert_eq!(reg.value("pool_size", &[]), Some(7.0));
    }

    #[test]
    fn gauge_overwrites() {
        let reg = MetricsRegistry::new();
        reg.set_gauge("temp", &[], 3.0).unwrap();
        reg.set_gauge("temp", &[], -1.5).unwrap();
        assert_eq!(reg.value("temp", &[]), Some(-1.5));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let reg = MetricsRegistry::new();
        reg.set_gauge("mixed", &[], 2.0).unwrap();
        assert!(reg.increment("mixed", &[], 1.0).is_err());
        assert_eq!(reg.value("mixed", &[]), Some(2.0));

        reg.inc("other", &[]).unwrap();
        assert!(reg.set_gauge("other", &[], 5.0).is_err());
        assert_eq!(reg.value("other", &[]), Some(1.0));
    }

    #[test]
    fn tag_order_does_not_matter() {
        let reg = MetricsRegistry::new();
        reg.inc("hits", &[("a", "1"), ("b", "2")]).unwrap();
        reg.inc("hits", &[("b", "2"), ("a", "1")]).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.render_to_string(), "hits{a=\"1\",b=\"2\"} 2\n");
    }

    #[test]
    fn duplicate_and_invalid_keys_are_rejected() {
        let reg = MetricsRegistry::new();
        assert!(reg.inc("hits", &[("a", "1"), ("a", "2")]).is_err());
        assert!(reg.inc("bad-name", &[]).is_err());
        assert!(reg.inc("hits", &[("bad key", "x")]).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn one_line_per_series_without_braces_for_empty_tags() {
        let reg = MetricsRegistry::new();
        reg.inc("a_total", &[]).unwrap();
        reg.inc("a_total", &[("k", "x")]).unwrap();
        reg.inc("a_total", &[("k", "y")]).unwrap();
        reg.set_gauge("b", &[], 0.5).unwrap();
        reg.inc("a_total", &[("k", "x")]).unwrap();

        let lines: Vec<String> = reg.render().collect();
        assert_eq!(
            lines,
            vec![
                "a_total 1".to_string(),
                "a_total{k=\"x\"} 2".to_string(),
                "a_total{k=\"y\"} 1".to_string(),
                "b 0.5".to_string(),
            ]
        );
    }

    #[test]
    fn default_tags_merge_and_can_be_overridden() {
        let reg =
            MetricsRegistry::with_default_tags([("application", "demo"), ("env", "dev")]).unwrap();
        reg.inc("up_total", &[]).unwrap();
        reg.inc("up_total", &[("env", "prod"), ("zone", "z1")]).unwrap();

        let lines: Vec<String> = reg.render().collect();
        assert_eq!(
            lines,
            vec![
                r#"up_total{application="demo",env="dev"} 1"#.to_string(),
                r#"up_total{application="demo",env="prod",zone="z1"} 1"#.to_string(),
            ]
        );
    }

    #[test]
    fn explicit_default_tag_is_the_same_series() {
        let reg = MetricsRegistry::with_default_tags([("env", "dev")]).unwrap();
        reg.inc("up_total", &[]).unwrap();
        reg.inc("up_total", &[("env", "dev")]).unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.render_to_string(), "up_total{env=\"dev\"} 2\n");
        assert_eq!(reg.value("up_total", &[]), Some(2.0));
        assert_eq!(reg.value("up_total", &[("env", "dev")]), Some(2.0));
    }

    #[test]
    fn rendered_lines_are_unique() {
        let reg = MetricsRegistry::with_default_tags([("env", "dev"), ("app", "a")]).unwrap();
        reg.inc("hits", &[]).unwrap();
        reg.inc("hits", &[("env", "dev")]).unwrap();
        reg.inc("hits", &[("app", "a"), ("env", "dev")]).unwrap();
        reg.inc("hits", &[("env", "prod")]).unwrap();

        let lines: Vec<String> = reg.render().collect();
        let mut unique = lines.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(lines.len(), unique.len());
        assert_eq!(lines.len(), reg.len());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn duplicate_default_key_keeps_first_value() {
        let reg = MetricsRegistry::with_default_tags([("env", "prod"), ("env", "dev")]).unwrap();
        assert_eq!(reg.default_tags(), &[("env".to_string(), "prod".to_string())]);
    }

    #[test]
    fn overflowing_increment_is_rejected() {
        let reg = MetricsRegistry::new();
        reg.increment("big_total", &[], 1e308).unwrap();

        let err = reg.increment("big_total", &[], 1e308).unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_ARGUMENT");
        assert_eq!(reg.value("big_total", &[]), Some(1e308));
        assert!(!reg.render_to_string().contains("Inf"));
    }

    #[test]
    fn invalid_default_tag_key_is_rejected() {
        assert!(MetricsRegistry::with_default_tags([("not-ok", "x")]).is_err());
    }

    #[test]
    fn render_is_restartable() {
        let reg = MetricsRegistry::new();
        reg.inc("n", &[]).unwrap();
        let first: Vec<String> = reg.render().collect();
        reg.inc("n", &[]).unwrap();
        let second: Vec<String> = reg.render().collect();
        assert_eq!(first, vec!["n 1".to_string()]);
        assert_eq!(second, vec!["n 2".to_string()]);
    }

    #[test]
    fn snapshot_lists_series_of_one_name() {
        let reg = MetricsRegistry::with_default_tags([("env", "dev")]).unwrap();
        reg.set_gauge("mem_bytes", &[("area", "heap")], 10.0).unwrap();
        reg.set_gauge("mem_bytes", &[("area", "stack")], 2.0).unwrap();
        reg.set_gauge("other", &[], 1.0).unwrap();

        let samples = reg.snapshot("mem_bytes");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].tags, vec![
            ("area".to_string(), "heap".to_string()),
            ("env".to_string(), "dev".to_string()),
        ]);
        assert_eq!(samples[0].value, 10.0);
        assert_eq!(samples[1].value, 2.0);
        assert!(reg.snapshot("missing").is_empty());
    }

    #[test]
    fn concurrent_increments_sum_exactly() {
        let reg = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        reg.inc("hits_total", &[("route", "/x")]).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.value("hits_total", &[("route", "/x")]), Some(8000.0));
    }
}
