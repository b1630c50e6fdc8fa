//! Panel HTTP client tests against a mock server

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use launcher::services::HttpPanelClient;
use launcher::{LauncherError, PanelClient};
use shared::{HostBatch, LifecycleState, ReporterDirective, StatusRecord};

fn batch() -> HostBatch {
    HostBatch::new(
        "host-a",
        vec![StatusRecord::idle("echo", Some("echo_bot".to_string()), LifecycleState::Restarting)],
    )
    .unwrap()
}

#[tokio::test]
async fn test_push_status_returns_poll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .and(body_partial_json(json!({
            "hostId": "host-a",
            "bots": [{ "name": "echo", "username": "echo_bot", "status": "restarting", "pid": null }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "action": "poll" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpPanelClient::new(server.uri()).unwrap();
    let directive = client.push_status(&batch()).await.unwrap();

    assert_eq!(directive, ReporterDirective::Poll);
}

#[tokio::test]
async fn test_push_status_returns_sleep() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "action": "sleep", "duration": 300 })))
        .mount(&server)
        .await;

    let client = HttpPanelClient::new(format!("{}/", server.uri())).unwrap();
    let directive = client.push_status(&batch()).await.unwrap();

    assert_eq!(directive, ReporterDirective::Sleep { duration: 300 });
}

#[tokio::test]
async fn test_rejected_batch_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid payload structure" })),
        )
        .mount(&server)
        .await;

    let client = HttpPanelClient::new(server.uri()).unwrap();
    let err = client.push_status(&batch()).await.unwrap_err();

    assert!(matches!(err, LauncherError::TransportError { .. }));
}

#[tokio::test]
async fn test_should_send_reads_gate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/should_send_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "shouldSend": false })))
        .mount(&server)
        .await;

    let client = HttpPanelClient::new(server.uri()).unwrap();

    assert!(!client.should_send().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_panel_is_transport_error() {
    // Nothing listens on the discard port
    let client = HttpPanelClient::new("http://127.0.0.1:9").unwrap();
    let err = client.should_send().await.unwrap_err();

    assert!(matches!(err, LauncherError::TransportError { .. }));
}
