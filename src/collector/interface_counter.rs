//! Interface counter metrics
//!
//! Parses `<show><counter><interface>all</interface></counter></show>`:
//! per-interface counter tables in a `<hw>` section (with a nested
//! `<port>` block) and an `<ifnet><ifnet>` section (with a nested
//! `<counters>` block). Only integer-valued children become samples;
//! everything else is skipped. Counter tag names are vendor-defined
//! and sanitized before use.

use roxmltree::Node;

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::{dedupe, sanitize_metric_name, MetricSample};

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "interface_counter_collector",
    command: "<show><counter><interface>all</interface></counter></show>",
    help: "Interface counter metrics from PAN-OS",
};

const STAGE: &str = "interface_counter_parse";

fn counter_sample(tag: &str, value: i64, iface: &str, help_prefix: &str) -> MetricSample {
    let tag = sanitize_metric_name(tag);
    MetricSample::gauge(
        format!("panos_interface_counter_{}", tag),
        value as f64,
        format!("{}: {}", help_prefix, tag),
    )
    .with_label("interface", iface)
}

/// Emit a sample for every integer-valued child of `node`
fn collect_int_children(
    node: Node,
    iface: &str,
    skip: &[&str],
    help_prefix: &str,
    samples: &mut Vec<MetricSample>,
) {
    for child in xml::elements(node) {
        let tag = child.tag_name().name();
        if skip.contains(&tag) {
            continue;
        }
        if let Some(value) = xml::text(child).and_then(|t| t.parse::<i64>().ok()) {
            samples.push(counter_sample(tag, value, iface, help_prefix));
        }
    }
}

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let root = doc.root();
    let mut samples = Vec::new();

    // Hardware counters
    for entry in xml::descendants(root, "hw")
        .into_iter()
        .flat_map(|hw| xml::children(hw, "entry"))
    {
        let iface = xml::child_text(entry, "name")
            .or_else(|| xml::child_text(entry, "interface"))
            .filter(|n| !n.is_empty());
        let Some(iface) = iface else {
            continue;
        };

        collect_int_children(
            entry,
            iface,
            &["name", "interface", "port"],
            "Interface counter",
            &mut samples,
        );

        if let Some(port) = xml::child(entry, "port") {
            collect_int_children(port, iface, &[], "Interface port counter", &mut samples);
        }
    }

    // Logical counters live one level deeper: ifnet/ifnet/entry
    for entry in xml::descendants(root, "ifnet")
        .into_iter()
        .flat_map(|outer| xml::children(outer, "ifnet"))
        .flat_map(|inner| xml::children(inner, "entry"))
    {
        let Some(iface) = xml::child_text(entry, "name").filter(|n| !n.is_empty()) else {
            continue;
        };

        collect_int_children(entry, iface, &["name"], "Interface ifnet counter", &mut samples);

        if let Some(counters) = xml::child(entry, "counters") {
            collect_int_children(
                counters,
                iface,
                &[],
                "Interface ifnet counters",
                &mut samples,
            );
        }
    }

    Ok(dedupe(samples))
}
