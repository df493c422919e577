//! PAN-OS metric collectors
//!
//! Each collector owns one vendor `op` command and one XML shape. The
//! set is closed: the seven variants below are enumerated in a static
//! registry built once at startup and never mutated. Parsing turns a
//! response body into flat `MetricSample`s or one structured
//! `ParseError` that the aggregator converts into an error sample.

mod client;
mod environmentals;
mod global_counter;
mod interface;
mod interface_counter;
mod resource_util;
mod session;
mod system_info;
mod xml;

pub use client::{PanosClient, RetryConfig};

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::config::DeviceConfig;
use crate::error::ParseError;
use crate::metrics::MetricSample;

/// The collector names accepted in configuration, in default run order
pub const KNOWN_COLLECTORS: [&str; 7] = [
    "system_info_collector",
    "system_environmentals_collector",
    "global_counter_collector",
    "session_collector",
    "interface_collector",
    "interface_counter_collector",
    "data_processor_resource_utilization_collector",
];

/// Static description of one vendor command and its parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorSpec {
    /// Collector identity, also the config-facing name
    pub name: &'static str,
    /// The `op` command sent to the management API
    pub command: &'static str,
    /// Default help string for samples without a more specific one
    pub help: &'static str,
}

/// One scrape target: host plus the credentials resolved from config.
/// Immutable for the duration of one scrape.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    /// Device hostname or IP, as given in the `target` query parameter
    pub host: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Optional API key sent as the `key` query parameter
    pub api_key: Option<String>,
}

impl DeviceTarget {
    /// Build a target from a config device entry
    pub fn from_config(host: &str, device: &DeviceConfig) -> Self {
        Self {
            host: host.to_string(),
            username: device.username.clone(),
            password: device.password.clone(),
            api_key: device.api_key.clone(),
        }
    }
}

/// The closed set of collector variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    SystemInfo,
    SystemEnvironmentals,
    GlobalCounter,
    Session,
    Interface,
    InterfaceCounter,
    DataProcessorResourceUtilization,
}

/// All collectors in default run order
pub const ALL_COLLECTORS: [Collector; 7] = [
    Collector::SystemInfo,
    Collector::SystemEnvironmentals,
    Collector::GlobalCounter,
    Collector::Session,
    Collector::Interface,
    Collector::InterfaceCounter,
    Collector::DataProcessorResourceUtilization,
];

static REGISTRY: Lazy<HashMap<&'static str, Collector>> = Lazy::new(|| {
    ALL_COLLECTORS
        .iter()
        .map(|c| (c.spec().name, *c))
        .collect()
});

impl Collector {
    /// Look up a collector by its configured name
    pub fn from_name(name: &str) -> Option<Collector> {
        REGISTRY.get(name).copied()
    }

    /// Resolve a configured name list to collectors, or all seven
    /// when no list is given. Names are assumed pre-validated by the
    /// config layer; unknown entries are skipped.
    pub fn resolve(names: Option<&[String]>) -> Vec<Collector> {
        match names {
            Some(names) => names
                .iter()
                .filter_map(|n| Collector::from_name(n))
                .collect(),
            None => ALL_COLLECTORS.to_vec(),
        }
    }

    /// The static spec for this variant
    pub fn spec(&self) -> &'static CollectorSpec {
        match self {
            Collector::SystemInfo => &system_info::SPEC,
            Collector::SystemEnvironmentals => &environmentals::SPEC,
            Collector::GlobalCounter => &global_counter::SPEC,
            Collector::Session => &session::SPEC,
            Collector::Interface => &interface::SPEC,
            Collector::InterfaceCounter => &interface_counter::SPEC,
            Collector::DataProcessorResourceUtilization => &resource_util::SPEC,
        }
    }

    /// Parse a raw response body into samples.
    ///
    /// A structurally invalid document yields a `ParseError` named
    /// after the parser; structural surprises inside a valid document
    /// skip fields rather than failing the whole collector.
    pub fn parse(
        &self,
        body: &str,
        target: &DeviceTarget,
    ) -> Result<Vec<MetricSample>, ParseError> {
        match self {
            Collector::SystemInfo => system_info::parse(body, target),
            Collector::SystemEnvironmentals => environmentals::parse(body, target),
            Collector::GlobalCounter => global_counter::parse(body, target),
            Collector::Session => session::parse(body, target),
            Collector::Interface => interface::parse(body, target),
            Collector::InterfaceCounter => interface_counter::parse(body, target),
            Collector::DataProcessorResourceUtilization => resource_util::parse(body, target),
        }
    }
}
