//! System identity metrics
//!
//! Parses the `<show><system><info/></system></show>` response: a
//! single `<system>` block of static identity fields. Numeric fields
//! become gauges; free-form fields become `_info` presence samples
//! carrying the text as a label.

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::{dedupe, MetricSample};

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "system_info_collector",
    command: "<show><system><info></info></system></show>",
    help: "System info metrics from PAN-OS",
};

const STAGE: &str = "system_info_parse";

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let mut samples = Vec::new();

    let Some(system) = xml::descendant(doc.root(), "system") else {
        return Ok(samples);
    };

    let uptime = xml::child_text_or(system, "uptime", "0");
    samples.push(MetricSample::gauge(
        "panos_system_uptime_seconds",
        parse_uptime(uptime) as f64,
        "System uptime in seconds",
    ));

    let sw_version = xml::child_text_or(system, "sw-version", "unknown");
    samples.push(
        MetricSample::gauge(
            "panos_system_software_version_info",
            1.0,
            "System software version (info label)",
        )
        .with_label("version", sw_version),
    );

    let model = xml::child_text_or(system, "model", "unknown");
    samples.push(
        MetricSample::gauge("panos_system_model_info", 1.0, "System model (info label)")
            .with_label("model", model),
    );

    let serial = xml::child_text_or(system, "serial", "unknown");
    samples.push(
        MetricSample::gauge("panos_system_serial_info", 1.0, "System serial (info label)")
            .with_label("serial", serial),
    );

    let multi_vsys = xml::child_text_or(system, "multi-vsys", "off");
    samples.push(MetricSample::gauge(
        "panos_system_multi_vsys_enabled",
        if multi_vsys.eq_ignore_ascii_case("on") {
            1.0
        } else {
            0.0
        },
        "System multi-vsys enabled (1=on, 0=off)",
    ));

    let op_mode = xml::child_text_or(system, "operational-mode", "unknown");
    samples.push(
        MetricSample::gauge(
            "panos_system_operational_mode_info",
            1.0,
            "System operational mode (info label)",
        )
        .with_label("mode", op_mode),
    );

    let cert_status = xml::child_text_or(system, "device-certificate-status", "unknown");
    samples.push(
        MetricSample::gauge(
            "panos_system_device_certificate_status_info",
            1.0,
            "Device certificate status (info label)",
        )
        .with_label("status", cert_status),
    );

    if let Some(mac_count) = xml::child_text(system, "mac_count") {
        if let Ok(count) = mac_count.parse::<f64>() {
            samples.push(MetricSample::gauge(
                "panos_system_mac_count",
                count,
                "System MAC address count",
            ));
        }
    }

    Ok(dedupe(samples))
}

/// Convert an uptime string like `"0 days, 20:32:51"` into seconds.
/// Anything not matching that shape collapses to 0.
fn parse_uptime(uptime: &str) -> u64 {
    let Some((days_part, time_part)) = uptime.split_once(" days, ") else {
        return 0;
    };
    let Ok(days) = days_part.trim().parse::<u64>() else {
        return 0;
    };
    let fields: Vec<&str> = time_part.trim().split(':').collect();
    if fields.len() != 3 {
        return 0;
    }
    let mut hms = [0u64; 3];
    for (slot, field) in hms.iter_mut().zip(&fields) {
        match field.parse::<u64>() {
            Ok(v) => *slot = v,
            Err(_) => return 0,
        }
    }
    days * 86400 + hms[0] * 3600 + hms[1] * 60 + hms[2]
}
