//! Global counter metrics
//!
//! Parses `<show><counter><global/></counter></show>`: a table of
//! named counters with value, rate and classification fields. Counter
//! names are vendor-defined free text and go through sanitization
//! before becoming part of a metric name.

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::{dedupe, sanitize_metric_name, MetricSample};

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "global_counter_collector",
    command: "<show><counter><global></global></counter></show>",
    help: "Global counter metrics from PAN-OS",
};

const STAGE: &str = "global_counter_parse";

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let mut samples = Vec::new();

    let entries: Vec<_> = xml::descendants(doc.root(), "global")
        .into_iter()
        .flat_map(|g| xml::descendants(g, "counters"))
        .flat_map(|c| xml::descendants(c, "entry"))
        .collect();

    for entry in entries {
        let name = sanitize_metric_name(xml::child_text_or(entry, "name", "unknown"));
        let severity = xml::child_text_or(entry, "severity", "unknown");
        let category = xml::child_text_or(entry, "category", "unknown");
        let aspect = xml::child_text_or(entry, "aspect", "unknown");
        let desc = xml::child_text(entry, "desc").unwrap_or("");

        if let Some(value) = xml::child_text(entry, "value") {
            if let Ok(value) = value.parse::<f64>() {
                let help = if desc.is_empty() {
                    format!("Global counter for {}", name)
                } else {
                    desc.to_string()
                };
                samples.push(
                    MetricSample::gauge(format!("panos_global_counter_{}", name), value, help)
                        .with_label("severity", severity)
                        .with_label("category", category)
                        .with_label("aspect", aspect),
                );
            }
        }

        if let Some(rate) = xml::child_text(entry, "rate") {
            if let Ok(rate) = rate.parse::<f64>() {
                let subject = if desc.is_empty() { name.as_str() } else { desc };
                samples.push(
                    MetricSample::gauge(
                        format!("panos_global_counter_{}_rate", name),
                        rate,
                        format!("Rate for {}", subject),
                    )
                    .with_label("severity", severity)
                    .with_label("category", category)
                    .with_label("aspect", aspect),
                );
            }
        }
    }

    Ok(dedupe(samples))
}
