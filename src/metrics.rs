//! Metric sample model
//!
//! One `MetricSample` is a fully-resolved (name, labels, value) data
//! point produced by a collector. Samples are created and consumed
//! within a single scrape; nothing here persists between requests.

use std::collections::HashSet;

/// Prometheus metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricKind {
    /// Gauge metric - a value that can go up and down
    #[default]
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
}

impl MetricKind {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// One fully-resolved metric data point
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Metric name, already sanitized to the Prometheus grammar
    pub name: String,
    /// Sample value
    pub value: f64,
    /// Metric type
    pub kind: MetricKind,
    /// Help text for the HELP line
    pub help: String,
    /// Labels in insertion (document) order
    pub labels: Vec<(String, String)>,
}

impl MetricSample {
    /// Create a gauge sample with no labels
    pub fn gauge(name: impl Into<String>, value: f64, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            kind: MetricKind::Gauge,
            help: help.into(),
            labels: Vec::new(),
        }
    }

    /// Attach a label; preserves insertion order
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Identity key used for deduplication: metric name plus an
    /// order-insensitive rendering of the label set.
    pub fn identity(&self) -> (String, String) {
        let mut pairs: Vec<String> = self
            .labels
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect();
        pairs.sort();
        (self.name.clone(), pairs.join(","))
    }
}

/// The synthetic sample emitted when a collector fails
pub fn error_sample(cause: impl Into<String>) -> MetricSample {
    MetricSample::gauge("panos_error", 1.0, "Error metric").with_label("error", cause.into())
}

/// The per-scrape up/down indicator, always emitted first
pub fn up_sample(up: bool) -> MetricSample {
    MetricSample::gauge(
        "panos_up",
        if up { 1.0 } else { 0.0 },
        "Device scrape status (1=up, 0=error)",
    )
}

/// Sanitize a metric name component to match the Prometheus grammar
/// `[a-zA-Z_:][a-zA-Z0-9_:]*` by replacing every character outside
/// `[a-zA-Z0-9_]` with an underscore, one for one.
pub fn sanitize_metric_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Collapse repeated samples sharing (name, label set) identity.
///
/// Applied per collector, never across collectors. First occurrence
/// wins; relative order of survivors is unchanged. Idempotent.
pub fn dedupe(samples: Vec<MetricSample>) -> Vec<MetricSample> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    samples
        .into_iter()
        .filter(|sample| seen.insert(sample.identity()))
        .collect()
}
