//! Data processor resource utilization metrics
//!
//! Parses the one-second resource monitor snapshot:
//! `<show><running><resource-monitor><second><last>1</last></second></resource-monitor></running></show>`.
//! Each data processor (`dp0`, `dp1`, ...) reports task utilization
//! percentages, per-core CPU load averages and maxima, and named
//! resource utilization entries.

use roxmltree::Node;

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::{sanitize_metric_name, MetricSample};

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "data_processor_resource_utilization_collector",
    command: "<show><running><resource-monitor><second><last>1</last></second></resource-monitor></running></show>",
    help: "Data processor resource utilization metrics from PAN-OS",
};

const STAGE: &str = "data_processor_parse";

/// Per-core load entries under cpu-load-average / cpu-load-maximum
fn collect_core_loads(
    section: Node,
    metric: &str,
    help: &str,
    dp_name: &str,
    samples: &mut Vec<MetricSample>,
) {
    for entry in xml::children(section, "entry") {
        let Some(coreid) = xml::child_text(entry, "coreid") else {
            continue;
        };
        let Some(value) = xml::child_text(entry, "value").and_then(|v| v.parse::<f64>().ok())
        else {
            continue;
        };
        samples.push(
            MetricSample::gauge(metric, value, help)
                .with_label("dp", dp_name)
                .with_label("coreid", coreid),
        );
    }
}

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let mut samples = Vec::new();

    let processors: Vec<_> = xml::descendants(doc.root(), "data-processors")
        .into_iter()
        .flat_map(xml::elements)
        .collect();

    for dp in processors {
        let dp_name = dp.tag_name().name();
        let Some(second) = xml::child(dp, "second") else {
            continue;
        };

        // Task utilization: percent-suffixed strings, e.g. "82%"
        if let Some(task) = xml::child(second, "task") {
            for field in xml::elements(task) {
                let Some(raw) = xml::text(field) else {
                    continue;
                };
                let Some(percent) = raw.strip_suffix('%') else {
                    continue;
                };
                if let Ok(value) = percent.parse::<f64>() {
                    let tag = sanitize_metric_name(field.tag_name().name());
                    samples.push(
                        MetricSample::gauge(
                            format!("panos_data_processor_task_{}", tag),
                            value,
                            format!("Data processor {} utilization (%)", tag),
                        )
                        .with_label("dp", dp_name),
                    );
                }
            }
        }

        if let Some(avg) = xml::child(second, "cpu-load-average") {
            collect_core_loads(
                avg,
                "panos_data_processor_cpu_load_average",
                "Data processor CPU load average per core",
                dp_name,
                &mut samples,
            );
        }

        if let Some(max) = xml::child(second, "cpu-load-maximum") {
            collect_core_loads(
                max,
                "panos_data_processor_cpu_load_maximum",
                "Data processor CPU load maximum per core",
                dp_name,
                &mut samples,
            );
        }

        if let Some(util) = xml::child(second, "resource-utilization") {
            for entry in xml::children(util, "entry") {
                let Some(name) = xml::child_text(entry, "name") else {
                    continue;
                };
                let Some(value) =
                    xml::child_text(entry, "value").and_then(|v| v.parse::<f64>().ok())
                else {
                    continue;
                };
                samples.push(
                    MetricSample::gauge(
                        "panos_data_processor_resource_utilization",
                        value,
                        "Data processor resource utilization",
                    )
                    .with_label("dp", dp_name)
                    .with_label("resource", name),
                );
            }
        }
    }

    Ok(samples)
}
