//! Interface state metrics
//!
//! Parses `<show><interface>all</interface></show>`, which reports
//! two sections keyed by interface name: `<hw>` (physical: mac,
//! speed, duplex, state, type) and `<ifnet>` (logical: zone, vsys,
//! tag, forwarding, ip). Logical entries are merged with their
//! physical counterpart; interfaces present only in `<hw>` are still
//! emitted with the reduced label set.

use super::xml;
use super::{CollectorSpec, DeviceTarget};
use crate::error::ParseError;
use crate::metrics::MetricSample;
use std::collections::HashMap;

pub(super) static SPEC: CollectorSpec = CollectorSpec {
    name: "interface_collector",
    command: "<show><interface>all</interface></show>",
    help: "Interface metrics from PAN-OS",
};

const STAGE: &str = "interface_parse";

/// Physical interface attributes from the `<hw>` section
#[derive(Debug, Clone)]
struct HwInfo {
    mac: String,
    speed: String,
    duplex: String,
    state: String,
    type_code: String,
}

impl Default for HwInfo {
    fn default() -> Self {
        Self {
            mac: "unknown".to_string(),
            speed: "ukn".to_string(),
            duplex: "ukn".to_string(),
            state: "unknown".to_string(),
            type_code: "unknown".to_string(),
        }
    }
}

/// Hardware type codes as reported by the API
fn type_name(code: &str) -> &str {
    match code {
        "0" => "ethernet",
        "2" => "ha",
        "3" => "vlan",
        "4" => "aggregate",
        "5" => "loopback",
        "6" => "tunnel",
        "7" => "hsci",
        other => other,
    }
}

fn state_value(state: &str) -> f64 {
    match state.to_ascii_lowercase().as_str() {
        "up" => 1.0,
        "down" => 0.0,
        _ => -1.0,
    }
}

fn duplex_value(duplex: &str) -> f64 {
    match duplex.to_ascii_lowercase().as_str() {
        "full" => 1.0,
        "half" => 0.0,
        _ => -1.0,
    }
}

fn speed_sample(name: &str, speed: &str) -> Option<MetricSample> {
    // speed is "ukn" for virtual interfaces; emit only when numeric
    let speed: i64 = speed.parse().ok()?;
    Some(
        MetricSample::gauge(
            "panos_interface_speed",
            speed as f64,
            "Interface speed (Mbps)",
        )
        .with_label("interface", name),
    )
}

fn duplex_sample(name: &str, duplex: &str) -> MetricSample {
    MetricSample::gauge(
        "panos_interface_duplex",
        duplex_value(duplex),
        "Interface duplex (1=full, 0=half, -1=unknown)",
    )
    .with_label("interface", name)
}

pub(super) fn parse(
    body: &str,
    _target: &DeviceTarget,
) -> Result<Vec<MetricSample>, ParseError> {
    let doc = xml::parse_document(body, STAGE)?;
    let root = doc.root();
    let mut samples = Vec::new();

    // Physical section, keyed by interface name
    let mut hw_info: HashMap<String, HwInfo> = HashMap::new();
    let mut hw_order: Vec<String> = Vec::new();
    for entry in xml::descendants(root, "hw")
        .into_iter()
        .flat_map(|hw| xml::children(hw, "entry"))
    {
        let Some(name) = xml::child_text(entry, "name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let info = HwInfo {
            mac: xml::child_text_or(entry, "mac", "unknown").to_string(),
            speed: xml::child_text_or(entry, "speed", "ukn").to_string(),
            duplex: xml::child_text_or(entry, "duplex", "ukn").to_string(),
            state: xml::child_text_or(entry, "state", "unknown").to_string(),
            type_code: xml::child_text_or(entry, "type", "unknown").to_string(),
        };
        if !hw_info.contains_key(name) {
            hw_order.push(name.to_string());
        }
        hw_info.insert(name.to_string(), info);
    }

    // Logical section, merged with physical data where present
    let mut seen_in_ifnet: Vec<String> = Vec::new();
    for entry in xml::descendants(root, "ifnet")
        .into_iter()
        .flat_map(|ifnet| xml::children(ifnet, "entry"))
    {
        let Some(name) = xml::child_text(entry, "name").filter(|n| !n.is_empty()) else {
            continue;
        };
        seen_in_ifnet.push(name.to_string());

        let default_hw = HwInfo::default();
        let hw = hw_info.get(name).unwrap_or(&default_hw);

        samples.push(
            MetricSample::gauge(
                "panos_interface_state",
                state_value(&hw.state),
                "Interface state (1=up, 0=down, -1=unknown)",
            )
            .with_label("interface", name)
            .with_label("mac", &hw.mac)
            .with_label("type", type_name(&hw.type_code))
            .with_label("zone", xml::child_text_or(entry, "zone", ""))
            .with_label("vsys", xml::child_text_or(entry, "vsys", ""))
            .with_label("tag", xml::child_text_or(entry, "tag", ""))
            .with_label("fwd", xml::child_text_or(entry, "fwd", ""))
            .with_label("ip", xml::child_text_or(entry, "ip", "")),
        );

        if let Some(sample) = speed_sample(name, &hw.speed) {
            samples.push(sample);
        }
        samples.push(duplex_sample(name, &hw.duplex));
    }

    // Interfaces only the hardware section knows about
    for name in &hw_order {
        if seen_in_ifnet.iter().any(|n| n == name) {
            continue;
        }
        let hw = &hw_info[name];
        samples.push(
            MetricSample::gauge(
                "panos_interface_state",
                state_value(&hw.state),
                "Interface state (1=up, 0=down, -1=unknown)",
            )
            .with_label("interface", name)
            .with_label("mac", &hw.mac)
            .with_label("type", type_name(&hw.type_code)),
        );
        if let Some(sample) = speed_sample(name, &hw.speed) {
            samples.push(sample);
        }
        samples.push(duplex_sample(name, &hw.duplex));
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_XML: &str = r#"
<response status="success">
  <result>
    <hw>
      <entry>
        <name>ethernet1/1</name>
        <duplex>full</duplex>
        <type>0</type>
        <state>up</state>
        <mac>00:1b:17:00:00:10</mac>
        <speed>1000</speed>
      </entry>
      <entry>
        <name>ha1-a</name>
        <duplex>ukn</duplex>
        <type>2</type>
        <state>down</state>
        <mac>00:1b:17:00:00:20</mac>
        <speed>ukn</speed>
      </entry>
    </hw>
    <ifnet>
      <entry>
        <name>ethernet1/1</name>
        <zone>trust</zone>
        <fwd>vr:default</fwd>
        <vsys>1</vsys>
        <tag>0</tag>
        <ip>10.0.0.1/24</ip>
      </entry>
      <entry>
        <name>tunnel.1</name>
        <zone>vpn</zone>
        <fwd>vr:default</fwd>
        <vsys>1</vsys>
        <tag>0</tag>
        <ip>N/A</ip>
      </entry>
    </ifnet>
  </result>
</response>
"#;

    fn target() -> DeviceTarget {
        DeviceTarget {
            host: "fw".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            api_key: None,
        }
    }

    fn states(samples: &[MetricSample]) -> Vec<&MetricSample> {
        samples
            .iter()
            .filter(|s| s.name == "panos_interface_state")
            .collect()
    }

    fn label<'a>(sample: &'a MetricSample, key: &str) -> Option<&'a str> {
        sample
            .labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_merged_interface() {
        let samples = parse(SAMPLE_XML, &target()).unwrap();
        let states = states(&samples);

        let eth = states
            .iter()
            .find(|s| label(s, "interface") == Some("ethernet1/1"))
            .unwrap();
        assert_eq!(eth.value, 1.0);
        assert_eq!(label(eth, "mac"), Some("00:1b:17:00:00:10"));
        assert_eq!(label(eth, "type"), Some("ethernet"));
        assert_eq!(label(eth, "zone"), Some("trust"));
        assert_eq!(label(eth, "ip"), Some("10.0.0.1/24"));
    }

    #[test]
    fn test_ifnet_only_interface_gets_defaults() {
        let samples = parse(SAMPLE_XML, &target()).unwrap();
        let states = states(&samples);

        let tunnel = states
            .iter()
            .find(|s| label(s, "interface") == Some("tunnel.1"))
            .unwrap();
        assert_eq!(tunnel.value, -1.0);
        assert_eq!(label(tunnel, "mac"), Some("unknown"));
        assert_eq!(label(tunnel, "type"), Some("unknown"));
    }

    #[test]
    fn test_hw_only_interface_reduced_labels() {
        let samples = parse(SAMPLE_XML, &target()).unwrap();
        let states = states(&samples);

        let ha = states
            .iter()
            .find(|s| label(s, "interface") == Some("ha1-a"))
            .unwrap();
        assert_eq!(ha.value, 0.0);
        assert_eq!(label(ha, "type"), Some("ha"));
        // reduced label set: no logical labels
        assert_eq!(label(ha, "zone"), None);
        assert_eq!(ha.labels.len(), 3);
    }

    #[test]
    fn test_speed_only_when_numeric() {
        let samples = parse(SAMPLE_XML, &target()).unwrap();
        let speeds: Vec<_> = samples
            .iter()
            .filter(|s| s.name == "panos_interface_speed")
            .collect();
        assert_eq!(speeds.len(), 1);
        assert_eq!(speeds[0].value, 1000.0);
        assert_eq!(label(speeds[0], "interface"), Some("ethernet1/1"));
    }

    #[test]
    fn test_duplex_values() {
        let samples = parse(SAMPLE_XML, &target()).unwrap();
        let duplexes: Vec<_> = samples
            .iter()
            .filter(|s| s.name == "panos_interface_duplex")
            .collect();
        // one per interface: ethernet1/1, tunnel.1, ha1-a
        assert_eq!(duplexes.len(), 3);
        let eth = duplexes
            .iter()
            .find(|s| label(s, "interface") == Some("ethernet1/1"))
            .unwrap();
        assert_eq!(eth.value, 1.0);
        let ha = duplexes
            .iter()
            .find(|s| label(s, "interface") == Some("ha1-a"))
            .unwrap();
        assert_eq!(ha.value, -1.0);
    }

    #[test]
    fn test_malformed_document() {
        let err = parse("</backwards>", &target()).unwrap_err();
        assert_eq!(err.stage, "interface_parse");
    }
}
