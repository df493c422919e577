//! Scrape aggregation
//!
//! Runs the configured collectors for one device, strictly
//! sequentially, and folds their outcomes into a single
//! `ScrapeResult`. Per-collector failures degrade the scrape (flip
//! `panos_up` to 0, append one error sample) but never prevent
//! sibling collectors from contributing their samples.

use tracing::{debug, warn};

use crate::collector::{Collector, DeviceTarget, PanosClient};
use crate::error::CollectResult;
use crate::exposition::format_samples;
use crate::metrics::{dedupe, error_sample, up_sample, MetricSample};

/// Accumulated outcome of one scrape.
///
/// Renders as exactly one `panos_up` sample, then all error samples
/// in collector order, then all success samples in collector order.
/// That ordering is a compatibility contract for consumers diffing
/// output textually.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    /// True when every configured collector succeeded
    pub up: bool,
    /// One error sample per failed collector, in collector order
    pub errors: Vec<MetricSample>,
    /// Successful collectors' deduplicated samples, in collector order
    pub samples: Vec<MetricSample>,
}

impl ScrapeResult {
    /// All samples in output order, `panos_up` first
    pub fn all_samples(&self) -> Vec<MetricSample> {
        let mut out = Vec::with_capacity(1 + self.errors.len() + self.samples.len());
        out.push(up_sample(self.up));
        out.extend(self.errors.iter().cloned());
        out.extend(self.samples.iter().cloned());
        out
    }

    /// Render the scrape as Prometheus exposition text
    pub fn render(&self) -> String {
        format_samples(&self.all_samples())
    }
}

/// Aggregates all enabled collectors into one scrape per device
pub struct Exporter {
    client: PanosClient,
    collectors: Vec<Collector>,
}

impl Exporter {
    /// Create an exporter over the given collectors
    pub fn new(client: PanosClient, collectors: Vec<Collector>) -> Self {
        Self { client, collectors }
    }

    /// The collectors this exporter runs, in order
    pub fn collectors(&self) -> &[Collector] {
        &self.collectors
    }

    /// Scrape one device: fetch and parse every configured collector.
    ///
    /// Each collector moves through fetch then parse independently;
    /// either failure produces one error sample and marks the scrape
    /// down. Successful sample sets are deduplicated individually,
    /// never across collectors.
    pub async fn collect(&self, target: &DeviceTarget) -> ScrapeResult {
        let mut result = ScrapeResult {
            up: true,
            errors: Vec::new(),
            samples: Vec::new(),
        };

        for collector in &self.collectors {
            let spec = collector.spec();

            let body: CollectResult<String> = self.client.fetch(spec, target).await;
            let body = match body {
                Ok(body) => body,
                Err(e) => {
                    warn!(collector = spec.name, host = %target.host, error = %e, "Fetch failed");
                    result.up = false;
                    result
                        .errors
                        .push(error_sample(format!("collector_failed: {}: {}", spec.name, e)));
                    continue;
                }
            };

            match collector.parse(&body, target) {
                Ok(samples) => {
                    debug!(
                        collector = spec.name,
                        count = samples.len(),
                        "Collector succeeded"
                    );
                    result.samples.extend(dedupe(samples));
                }
                Err(e) => {
                    warn!(collector = spec.name, host = %target.host, error = %e, "Parse failed");
                    result.up = false;
                    result.errors.push(error_sample(e.to_string()));
                }
            }
        }

        result
    }
}
