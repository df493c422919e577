//! PAN-OS management API HTTP client
//!
//! One authenticated GET per collector command, with bounded retry on
//! transient upstream server errors.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{CollectorSpec, DeviceTarget};
use crate::error::{CollectResult, CollectorError};

/// Per-attempt socket timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Retry policy for transient upstream server errors
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Delay growth factor per retry
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

/// HTTP client for the PAN-OS XML management API
#[derive(Clone)]
pub struct PanosClient {
    client: Client,
    retry: RetryConfig,
    scheme: String,
}

impl PanosClient {
    /// Create a new client.
    ///
    /// TLS certificate verification is disabled: PAN-OS management
    /// interfaces commonly present self-signed certificates. This
    /// matches the upstream exporter's behavior and is an explicit
    /// trust decision, not an oversight.
    pub fn new() -> CollectResult<Self> {
        let client = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            retry: RetryConfig::default(),
            scheme: "https".to_string(),
        })
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the URL scheme. Production devices only speak HTTPS;
    /// tests point this at plain-HTTP mock servers.
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    fn api_url(&self, target: &DeviceTarget) -> String {
        format!("{}://{}/api/", self.scheme, target.host)
    }

    /// Fetch the raw response body for one collector command.
    ///
    /// Retries only on {500, 502, 503, 504} with exponential backoff;
    /// timeouts, connection failures and other statuses fail
    /// immediately.
    #[instrument(skip(self, spec, target), fields(host = %target.host, collector = spec.name))]
    pub async fn fetch(&self, spec: &CollectorSpec, target: &DeviceTarget) -> CollectResult<String> {
        let mut delay = self.retry.initial_delay;
        let mut last_status = None;

        for attempt in 0..=self.retry.max_retries {
            match self.fetch_once(spec, target).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => {
                    last_status = e.http_status();
                    if attempt < self.retry.max_retries {
                        warn!(
                            attempt = attempt + 1,
                            max = self.retry.max_retries,
                            status = ?last_status,
                            delay_ms = delay.as_millis() as u64,
                            "Upstream server error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        delay = Duration::from_secs_f64(
                            delay.as_secs_f64() * self.retry.multiplier,
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(CollectorError::RetriesExhausted {
            status: last_status.unwrap_or(0),
            attempts: self.retry.max_retries + 1,
        })
    }

    async fn fetch_once(
        &self,
        spec: &CollectorSpec,
        target: &DeviceTarget,
    ) -> CollectResult<String> {
        let mut request = self
            .client
            .get(self.api_url(target))
            .query(&[("type", "op"), ("cmd", spec.command)])
            .basic_auth(&target.username, Some(&target.password));

        if let Some(key) = &target.api_key {
            request = request.query(&[("key", key)]);
        }

        debug!("Sending op command");

        let response = request.send().await.map_err(CollectorError::HttpRequest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(CollectorError::HttpResponse)
    }
}
