//! Scrape pipeline integration tests
//!
//! End-to-end tests against a mock PAN-OS management API that verify:
//! - fetch → parse → dedupe → aggregate for real collector commands
//! - partial-failure isolation and the panos_up contract
//! - the transport retry policy

use std::time::Duration;

use panos_exporter::collector::{Collector, DeviceTarget, PanosClient, RetryConfig};
use panos_exporter::exporter::Exporter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SYSTEM_INFO_CMD: &str = "<show><system><info></info></system></show>";
const SESSION_CMD: &str = "<show><session><info></info></session></show>";

const SYSTEM_INFO_XML: &str = r#"
<response status="success">
  <result>
    <system>
      <uptime>0 days, 20:32:51</uptime>
      <sw-version>10.1.0</sw-version>
      <model>PA-220</model>
      <serial>1234567890</serial>
      <multi-vsys>off</multi-vsys>
    </system>
  </result>
</response>
"#;

const SESSION_XML: &str = r#"
<response status="success">
  <result>
    <num-active>77</num-active>
    <hw-offload>True</hw-offload>
  </result>
</response>
"#;

/// A retry policy with short delays so tests stay fast
fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        initial_delay: Duration::from_millis(10),
        multiplier: 2.0,
    }
}

/// Target pointing at the mock server over plain HTTP
fn target_for(server: &MockServer) -> DeviceTarget {
    DeviceTarget {
        host: server
            .uri()
            .strip_prefix("http://")
            .expect("mock uri")
            .to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        api_key: None,
    }
}

fn test_client() -> PanosClient {
    PanosClient::new()
        .expect("client")
        .with_scheme("http")
        .with_retry(fast_retry())
}

async fn mount_command(server: &MockServer, cmd: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "op"))
        .and(query_param("cmd", cmd))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_success() {
    let server = MockServer::start().await;
    mount_command(&server, SYSTEM_INFO_CMD, SYSTEM_INFO_XML).await;
    mount_command(&server, SESSION_CMD, SESSION_XML).await;

    let exporter = Exporter::new(
        test_client(),
        vec![Collector::SystemInfo, Collector::Session],
    );
    let result = exporter.collect(&target_for(&server)).await;

    assert!(result.up, "all collectors succeeded");
    assert!(result.errors.is_empty());

    let output = result.render();
    assert_eq!(output.matches("panos_up ").count(), 1);
    assert!(output.contains("panos_up 1"));
    assert!(output.contains("panos_system_uptime_seconds 73971"));
    assert!(output.contains("panos_system_model_info{model=\"PA-220\"} 1"));
    assert!(output.contains("panos_session_num_active 77"));
    assert!(output.contains("panos_session_hw_offload 1"));

    // collector order is preserved: system info before session
    let uptime_pos = output.find("panos_system_uptime_seconds").unwrap();
    let session_pos = output.find("panos_session_num_active").unwrap();
    assert!(uptime_pos < session_pos);
}

#[tokio::test]
async fn test_failing_collector_does_not_abort_siblings() {
    let server = MockServer::start().await;
    mount_command(&server, SYSTEM_INFO_CMD, SYSTEM_INFO_XML).await;
    // session command answers 404: non-retryable, fails immediately
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("cmd", SESSION_CMD))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let exporter = Exporter::new(
        test_client(),
        vec![Collector::SystemInfo, Collector::Session],
    );
    let result = exporter.collect(&target_for(&server)).await;

    assert!(!result.up);
    assert_eq!(result.errors.len(), 1);

    let output = result.render();
    assert!(output.contains("panos_up 0"));
    assert!(output.contains("collector_failed: session_collector"));
    // the healthy collector still contributed
    assert!(output.contains("panos_system_uptime_seconds 73971"));

    // errors render before success samples
    let err_pos = output.find("panos_error").unwrap();
    let ok_pos = output.find("panos_system_uptime_seconds").unwrap();
    assert!(err_pos < ok_pos);
}

#[tokio::test]
async fn test_parse_failure_yields_error_sample() {
    let server = MockServer::start().await;
    mount_command(&server, SYSTEM_INFO_CMD, "this is not xml <").await;

    let exporter = Exporter::new(test_client(), vec![Collector::SystemInfo]);
    let result = exporter.collect(&target_for(&server)).await;

    assert!(!result.up);
    assert_eq!(result.errors.len(), 1);
    let output = result.render();
    assert!(output.contains("panos_up 0"));
    assert!(output.contains("system_info_parse"));
}

#[tokio::test]
async fn test_retry_then_success_yields_no_error() {
    let server = MockServer::start().await;

    // first attempt gets a 503, every later attempt succeeds
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("cmd", SYSTEM_INFO_CMD))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_command(&server, SYSTEM_INFO_CMD, SYSTEM_INFO_XML).await;

    let exporter = Exporter::new(test_client(), vec![Collector::SystemInfo]);
    let result = exporter.collect(&target_for(&server)).await;

    assert!(result.up, "one 503 then success should not degrade");
    assert!(result.errors.is_empty());
    assert!(result.render().contains("panos_system_uptime_seconds 73971"));
}

#[tokio::test]
async fn test_retries_exhausted_yields_one_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4) // initial attempt + 3 retries
        .mount(&server)
        .await;

    let exporter = Exporter::new(test_client(), vec![Collector::SystemInfo]);
    let result = exporter.collect(&target_for(&server)).await;

    assert!(!result.up);
    assert_eq!(result.errors.len(), 1);
    let output = result.render();
    assert_eq!(output.matches("panos_error").count(), 3); // HELP + TYPE + sample line
    assert!(output.contains("Retries exhausted"));
}

#[tokio::test]
async fn test_non_retryable_status_fails_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let exporter = Exporter::new(test_client(), vec![Collector::SystemInfo]);
    let result = exporter.collect(&target_for(&server)).await;

    assert!(!result.up);
    assert!(result
        .render()
        .contains("collector_failed: system_info_collector"));
}

#[tokio::test]
async fn test_api_key_forwarded_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("key", "my-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SYSTEM_INFO_XML))
        .expect(1)
        .mount(&server)
        .await;

    let mut target = target_for(&server);
    target.api_key = Some("my-api-key".to_string());

    let exporter = Exporter::new(test_client(), vec![Collector::SystemInfo]);
    let result = exporter.collect(&target).await;

    assert!(result.up);
}
