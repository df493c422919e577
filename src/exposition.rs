//! Prometheus exposition format output
//!
//! Renders `MetricSample`s into the text exposition format
//! (version 0.0.4):
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",...} <value>
//! ```
//!
//! Each sample gets its own HELP/TYPE/value triple; labels render in
//! their stored order. Label values are double-quoted but embedded
//! quotes are not escaped, matching the upstream contract (a known
//! limitation consumers depend on diffing against). Device identity
//! is conveyed by which scrape response a sample belongs to; no
//! `instance` or `device` label is ever emitted here.

use crate::metrics::MetricSample;

/// Format a sequence of samples into exposition text
pub fn format_samples(samples: &[MetricSample]) -> String {
    let mut output = String::with_capacity(samples.len() * 120);
    for sample in samples {
        output.push_str(&format_sample(sample));
    }
    output
}

/// Format a single sample as a HELP/TYPE/value triple
pub fn format_sample(sample: &MetricSample) -> String {
    let label_str = if sample.labels.is_empty() {
        String::new()
    } else {
        let pairs: Vec<String> = sample
            .labels
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect();
        format!("{{{}}}", pairs.join(","))
    };

    format!(
        "# HELP {name} {help}\n# TYPE {name} {kind}\n{name}{labels} {value}\n",
        name = sample.name,
        help = sample.help,
        kind = sample.kind.as_str(),
        labels = label_str,
        value = format_value(sample.value),
    )
}

/// Format a numeric value for Prometheus
///
/// - NaN → "NaN"
/// - +Inf / -Inf → "+Inf" / "-Inf"
/// - Integer-valued floats are formatted without a decimal point
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricKind, MetricSample};

    #[test]
    fn test_format_simple_sample() {
        let sample = MetricSample::gauge("panos_system_uptime_seconds", 73971.0, "System uptime in seconds");
        let output = format_sample(&sample);
        assert_eq!(
            output,
            "# HELP panos_system_uptime_seconds System uptime in seconds\n\
             # TYPE panos_system_uptime_seconds gauge\n\
             panos_system_uptime_seconds 73971\n"
        );
    }

    #[test]
    fn test_format_sample_with_labels() {
        let sample = MetricSample::gauge("panos_thermal_sensor_celsius", 42.5, "Thermal sensor temperature in Celsius")
            .with_label("sensor", "Temperature @ Fan Tray")
            .with_label("alarm", "false");
        let output = format_sample(&sample);
        assert!(output.contains(
            "panos_thermal_sensor_celsius{sensor=\"Temperature @ Fan Tray\",alarm=\"false\"} 42.5"
        ));
    }

    #[test]
    fn test_label_order_preserved() {
        let sample = MetricSample::gauge("m", 1.0, "h")
            .with_label("zebra", "1")
            .with_label("alpha", "2");
        let output = format_sample(&sample);
        // Stored order, not alphabetical
        assert!(output.contains("m{zebra=\"1\",alpha=\"2\"} 1"));
    }

    #[test]
    fn test_counter_type_line() {
        let mut sample = MetricSample::gauge("panos_interface_counter_ibytes", 1234.0, "Interface counter: ibytes");
        sample.kind = MetricKind::Counter;
        let output = format_sample(&sample);
        assert!(output.contains("# TYPE panos_interface_counter_ibytes counter"));
    }

    #[test]
    fn test_no_device_label() {
        let sample = MetricSample::gauge("panos_up", 1.0, "Device scrape status (1=up, 0=error)");
        let output = format_sample(&sample);
        assert!(!output.contains("device="));
        assert!(!output.contains("instance="));
    }

    #[test]
    fn test_format_value_integer() {
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-1.0), "-1");
    }

    #[test]
    fn test_format_value_decimal() {
        assert_eq!(format_value(82.5), "82.5");
    }

    #[test]
    fn test_format_value_special() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_samples_concatenates() {
        let samples = vec![
            MetricSample::gauge("a", 1.0, "first"),
            MetricSample::gauge("b", 2.0, "second"),
        ];
        let output = format_samples(&samples);
        let a_pos = output.find("# HELP a first").unwrap();
        let b_pos = output.find("# HELP b second").unwrap();
        assert!(a_pos < b_pos);
        assert!(output.ends_with("b 2\n"));
    }

    #[test]
    fn test_format_empty() {
        assert!(format_samples(&[]).is_empty());
    }
}
