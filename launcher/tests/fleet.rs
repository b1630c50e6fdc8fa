//! End-to-end launcher tests: config file in, status batches out

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use launcher::{Fleet, FleetConfig, LauncherError};

fn fleet_config(config_path: PathBuf, panel_url: Option<String>) -> FleetConfig {
    FleetConfig {
        config_path,
        panel_url,
        host_id: "test-host".to_string(),
        interval: Duration::from_millis(50),
        restart_delay: Duration::from_millis(50),
        check_before_send: false,
        shutdown_grace: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_missing_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let fleet = Fleet::new(fleet_config(dir.path().join("start.txt"), None));

    let err = tokio_test::assert_err!(fleet.run().await);
    assert!(matches!(err, LauncherError::ConfigMissing { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_fleet_reports_running_bots() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "action": "poll" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("worker.sh");
    std::fs::write(&script, "sleep 30\n").unwrap();
    let config = dir.path().join("start.txt");
    std::fs::write(&config, format!("# fleet\n(worker) sh {}\n", script.display())).unwrap();

    let fleet = Fleet::new(fleet_config(config, Some(server.uri())));
    let shutdown = fleet.get_shutdown_sender();
    let handle = tokio::spawn(fleet.run());

    let mut reported = None;
    for _ in 0..200 {
        let requests = server.received_requests().await.unwrap_or_default();
        let running = requests.iter().rev().find_map(|request| {
            let body: Value = serde_json::from_slice(&request.body).ok()?;
            let bot = body["bots"].get(0)?.clone();
            (bot["status"] == "running").then_some((body["hostId"].clone(), bot))
        });
        if running.is_some() {
            reported = running;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let (host_id, bot) = reported.expect("no running bot was reported");
    assert_eq!(host_id, "test-host");
    assert_eq!(bot["name"], "worker");
    assert!(bot["pid"].as_u64().is_some());

    shutdown.send(()).await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("fleet did not shut down")
        .unwrap();
    tokio_test::assert_ok!(result);
}

#[cfg(unix)]
#[tokio::test]
async fn test_fleet_without_panel_only_supervises() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("start.txt");
    std::fs::write(&config, "(napper) sleep 30\n").unwrap();

    let fleet = Fleet::new(fleet_config(config, None));
    let supervisor = fleet.supervisor().clone();
    let shutdown = fleet.get_shutdown_sender();
    let handle = tokio::spawn(fleet.run());

    let mut running = false;
    for _ in 0..200 {
        if supervisor.len().await == 1 {
            running = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(running, "bot was never started");

    shutdown.send(()).await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("fleet did not shut down")
        .unwrap();
    tokio_test::assert_ok!(result);
    assert!(supervisor.is_empty().await);
}
