//! Supervisor integration tests against real OS processes

#![cfg(unix)]

use std::time::Duration;

use launcher::services::{DotenvLoader, RealSupervisor, TracingLogSink};
use launcher::{BotSpec, ProcessTable};
use shared::LifecycleState;

fn supervisor(restart_delay: Duration) -> RealSupervisor<TracingLogSink, DotenvLoader> {
    RealSupervisor::new(restart_delay, TracingLogSink::new(), DotenvLoader::new())
}

fn shell(name: &str, script: &str) -> BotSpec {
    BotSpec {
        name: name.to_string(),
        command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
    }
}

async fn wait_for<F>(supervisor: &RealSupervisor<TracingLogSink, DotenvLoader>, mut predicate: F) -> bool
where
    F: FnMut(&[launcher::traits::ProcessSnapshot]) -> bool,
{
    for _ in 0..200 {
        if predicate(&supervisor.snapshot().await) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// A bot that keeps crashing is restarted every time under the same name
#[tokio::test]
async fn test_crashing_bot_restarts_unbounded() {
    let supervisor = supervisor(Duration::from_millis(20));
    supervisor.start(shell("crasher", "exit 1")).await.unwrap();

    let restarted = wait_for(&supervisor, |bots| {
        bots.len() == 1 && bots[0].name == "crasher" && bots[0].restart_count >= 3
    })
    .await;
    assert!(restarted, "crashing bot was not restarted repeatedly");

    supervisor.shutdown_all().await;
    assert!(supervisor.wait_idle(Duration::from_secs(5)).await);
}

/// A bot that exits with code 0 is removed and never comes back
#[tokio::test]
async fn test_clean_exit_is_not_restarted() {
    let supervisor = supervisor(Duration::from_millis(20));
    supervisor.start(shell("oneshot", "exit 0")).await.unwrap();

    assert!(supervisor.wait_idle(Duration::from_secs(5)).await);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(supervisor.snapshot().await.is_empty());
}

/// Crashed bots show as restarting while their timer is pending
#[tokio::test]
async fn test_crash_shows_restarting_between_runs() {
    let supervisor = supervisor(Duration::from_secs(30));
    supervisor.start(shell("slow", "exit 3")).await.unwrap();

    let restarting = wait_for(&supervisor, |bots| {
        bots.first()
            .map(|bot| bot.state == LifecycleState::Restarting && bot.pid.is_none())
            .unwrap_or(false)
    })
    .await;
    assert!(restarting);

    supervisor.shutdown_all().await;
    assert!(supervisor.wait_idle(Duration::from_secs(1)).await);
}

/// Invalid UTF-8 on stdout must not close the pipe under a running bot
#[tokio::test]
async fn test_binary_output_keeps_bot_running() {
    let supervisor = supervisor(Duration::from_millis(20));
    let script = "printf '\\377\\376\\n'; while true; do echo tick; sleep 0.05; done";
    supervisor.start(shell("binary", script)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;

    let bots = supervisor.snapshot().await;
    assert_eq!(bots.len(), 1);
    assert_eq!(bots[0].state, LifecycleState::Running);
    assert_eq!(bots[0].restart_count, 0);

    supervisor.shutdown_all().await;
    assert!(supervisor.wait_idle(Duration::from_secs(5)).await);
}

/// Shutdown cancels pending restarts and terminates running bots
#[tokio::test]
async fn test_shutdown_cancels_restarts_and_stops_bots() {
    let supervisor = supervisor(Duration::from_millis(200));
    supervisor.start(shell("crasher", "exit 1")).await.unwrap();
    supervisor.start(shell("sleeper", "sleep 30")).await.unwrap();

    // Let the crasher exit so its restart timer is armed
    let armed = wait_for(&supervisor, |bots| {
        bots.iter()
            .any(|bot| bot.name == "crasher" && bot.state == LifecycleState::Restarting)
    })
    .await;
    assert!(armed);

    let signalled = supervisor.shutdown_all().await;
    assert!(signalled >= 1);
    assert!(supervisor.wait_idle(Duration::from_secs(5)).await);

    // The cancelled timer would have fired by now
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(supervisor.snapshot().await.is_empty());
}

/// A missing executable is reported as error and retried
#[tokio::test]
async fn test_spawn_failure_is_errored() {
    let supervisor = supervisor(Duration::from_secs(30));
    let spec = BotSpec {
        name: "ghost".to_string(),
        command: vec!["/definitely/not/a/real/binary".to_string()],
    };

    assert!(supervisor.start(spec).await.is_err());

    let snapshot = supervisor.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].state, LifecycleState::Errored);
    assert_eq!(snapshot[0].pid, None);

    supervisor.shutdown_all().await;
    assert!(supervisor.is_empty().await);
}

/// The env file next to the script is applied to the bot
#[tokio::test]
async fn test_env_file_next_to_script_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("bot.sh");
    let marker = dir.path().join("marker");
    std::fs::write(&script, format!("echo \"$GREETING\" > {}\nsleep 30\n", marker.display())).unwrap();
    std::fs::write(dir.path().join(".env"), "GREETING=hello\nBOT_USERNAME=greeter_bot\n").unwrap();

    let supervisor = supervisor(Duration::from_millis(50));
    supervisor
        .start(BotSpec {
            name: "greeter".to_string(),
            command: vec!["sh".to_string(), script.display().to_string()],
        })
        .await
        .unwrap();

    let snapshot = supervisor.snapshot().await;
    assert_eq!(snapshot[0].username.as_deref(), Some("greeter_bot"));

    let mut contents = String::new();
    for _ in 0..200 {
        contents = std::fs::read_to_string(&marker).unwrap_or_default();
        if !contents.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(contents.trim(), "hello");

    supervisor.shutdown_all().await;
    assert!(supervisor.wait_idle(Duration::from_secs(5)).await);
}
