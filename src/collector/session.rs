//! Session table scalar metrics
//!
//! Parses the `<show><session><info/></session></show>` response: a
//! flat dump of scalar fields under `<result>`. Every leaf is coerced
//! to the most specific applicable type; opaque strings are emitted
//! as `_info` presence samples so the value field stays numeric.

use super::xml::{self, LeafValue};
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::{dedupe, sanitize_metric_name, MetricSample};

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "session_collector",
    command: "<show><session><info></info></session></show>",
    help: "Session info metrics from PAN-OS",
};

const STAGE: &str = "session_info_parse";

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let mut samples = Vec::new();

    let Some(result) = xml::descendant(doc.root(), "result") else {
        return Ok(samples);
    };

    for elem in xml::elements(result) {
        let tag = sanitize_metric_name(elem.tag_name().name());
        let Some(raw) = xml::text(elem) else {
            continue;
        };

        match xml::coerce(raw) {
            LeafValue::Int(i) => samples.push(MetricSample::gauge(
                format!("panos_session_{}", tag),
                i as f64,
                format!("Session info: {}", tag),
            )),
            LeafValue::Float(f) => samples.push(MetricSample::gauge(
                format!("panos_session_{}", tag),
                f,
                format!("Session info: {}", tag),
            )),
            LeafValue::Bool(b) => samples.push(MetricSample::gauge(
                format!("panos_session_{}", tag),
                if b { 1.0 } else { 0.0 },
                format!("Session info: {} (1=True, 0=False)", tag),
            )),
            LeafValue::Text(value) => samples.push(
                MetricSample::gauge(
                    format!("panos_session_{}_info", tag),
                    1.0,
                    format!("Session info: {} (info label)", tag),
                )
                .with_label("value", value),
            ),
        }
    }

    Ok(dedupe(samples))
}
