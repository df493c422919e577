//! Environmental sensor metrics
//!
//! Parses `<show><system><environmentals/></system></show>`: thermal,
//! fan, power and power-supply sensor tables. Sensor readings with a
//! missing or non-numeric value are skipped, never fatal.

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::MetricSample;
use std::collections::HashSet;

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "system_environmentals_collector",
    command: "<show><system><environmentals></environmentals></system></show>",
    help: "System environmentals metrics from PAN-OS",
};

const STAGE: &str = "system_environmentals_parse";

/// Alarm flag as the lowercase label value the dashboards expect
fn alarm_label(entry: roxmltree::Node) -> &'static str {
    if xml::child_text_or(entry, "alarm", "False").eq_ignore_ascii_case("true") {
        "true"
    } else {
        "false"
    }
}

fn sensor_entries<'a, 'i>(
    root: roxmltree::Node<'a, 'i>,
    section: &str,
) -> Vec<roxmltree::Node<'a, 'i>> {
    xml::descendants(root, section)
        .into_iter()
        .flat_map(|s| xml::descendants(s, "entry"))
        .collect()
}

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let root = doc.root();
    let mut samples = Vec::new();

    // Thermal sensors
    for entry in sensor_entries(root, "thermal") {
        let desc = xml::child_text_or(entry, "description", "unknown");
        if let Some(temp) = xml::child_text(entry, "DegreesC") {
            if let Ok(celsius) = temp.parse::<f64>() {
                samples.push(
                    MetricSample::gauge(
                        "panos_thermal_sensor_celsius",
                        celsius,
                        "Thermal sensor temperature in Celsius",
                    )
                    .with_label("sensor", desc)
                    .with_label("alarm", alarm_label(entry)),
                );
            }
        }
    }

    // Fan sensors
    for entry in sensor_entries(root, "fan") {
        let desc = xml::child_text_or(entry, "description", "unknown");
        if let Some(rpm) = xml::child_text(entry, "RPMs") {
            if let Ok(rpm) = rpm.parse::<f64>() {
                samples.push(
                    MetricSample::gauge("panos_fan_rpm", rpm, "Fan speed in RPM")
                        .with_label("fan", desc)
                        .with_label("alarm", alarm_label(entry)),
                );
            }
        }
    }

    // Power sensors; some chassis report the same rail twice
    let mut seen_power: HashSet<(String, &'static str)> = HashSet::new();
    for entry in sensor_entries(root, "power") {
        let desc = xml::child_text_or(entry, "description", "unknown");
        let alarm = alarm_label(entry);
        if let Some(volts) = xml::child_text(entry, "Volts") {
            if let Ok(volts) = volts.parse::<f64>() {
                if seen_power.insert((desc.to_string(), alarm)) {
                    samples.push(
                        MetricSample::gauge(
                            "panos_power_sensor_volts",
                            volts,
                            "Power sensor voltage in Volts",
                        )
                        .with_label("sensor", desc)
                        .with_label("alarm", alarm),
                    );
                }
            }
        }
    }

    // Power supply presence
    for entry in sensor_entries(root, "power-supply") {
        let desc = xml::child_text_or(entry, "description", "unknown");
        let inserted = xml::child_text_or(entry, "Inserted", "False").eq_ignore_ascii_case("true");
        samples.push(
            MetricSample::gauge(
                "panos_power_supply_inserted",
                if inserted { 1.0 } else { 0.0 },
                "Power supply inserted (1=True, 0=False)",
            )
            .with_label("supply", desc)
            .with_label("alarm", alarm_label(entry)),
        );
    }

    Ok(samples)
}
