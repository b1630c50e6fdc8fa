//! Bot status records and host batches
//!
//! Field names follow the JSON shape the dashboard reads:
//! `{ name, username, status, pid, cpu, memory, uptime }`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Lifecycle state of a supervised bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Running,
    Restarting,
    #[serde(rename = "error")]
    Errored,
    Terminated,
}

impl LifecycleState {
    pub fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Running)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Restarting => write!(f, "restarting"),
            LifecycleState::Errored => write!(f, "error"),
            LifecycleState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Point-in-time snapshot of one bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub name: String,

    /// Display identity, e.g. the bot's public username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub status: LifecycleState,

    /// OS process id, null unless running
    #[serde(default)]
    pub pid: Option<u32>,

    /// CPU usage in percent
    #[serde(default)]
    pub cpu: f32,

    /// Resident memory in bytes
    #[serde(default)]
    pub memory: u64,

    /// Seconds since the current process was spawned
    #[serde(default)]
    pub uptime: u64,
}

impl StatusRecord {
    /// Record for a bot without a live process: no pid, zeroed metrics
    pub fn idle(name: impl Into<String>, username: Option<String>, status: LifecycleState) -> Self {
        Self {
            name: name.into(),
            username,
            status,
            pid: None,
            cpu: 0.0,
            memory: 0,
            uptime: 0,
        }
    }
}

/// Unit transmitted from one launcher host to the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostBatch {
    #[serde(rename = "hostId")]
    pub host_id: String,
    pub bots: Vec<StatusRecord>,
}

impl HostBatch {
    /// Build a batch, rejecting an empty host id
    pub fn new(host_id: impl Into<String>, bots: Vec<StatusRecord>) -> SharedResult<Self> {
        let host_id = host_id.into();
        if host_id.trim().is_empty() {
            return Err(SharedError::EmptyHostId);
        }
        Ok(Self { host_id, bots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle_state_wire_names() {
        assert_eq!(serde_json::to_value(LifecycleState::Running).unwrap(), json!("running"));
        assert_eq!(serde_json::to_value(LifecycleState::Restarting).unwrap(), json!("restarting"));
        assert_eq!(serde_json::to_value(LifecycleState::Errored).unwrap(), json!("error"));
        assert_eq!(serde_json::to_value(LifecycleState::Terminated).unwrap(), json!("terminated"));
        assert_eq!(LifecycleState::Errored.to_string(), "error");
    }

    #[test]
    fn test_idle_record_serializes_null_pid() {
        let record = StatusRecord::idle("echo", None, LifecycleState::Restarting);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["pid"], json!(null));
        assert_eq!(value["cpu"], json!(0.0));
        assert_eq!(value["memory"], json!(0));
        assert!(value.get("username").is_none());
    }

    #[test]
    fn test_host_batch_rejects_empty_host() {
        assert!(matches!(HostBatch::new("", vec![]), Err(SharedError::EmptyHostId)));
        assert!(matches!(HostBatch::new("   ", vec![]), Err(SharedError::EmptyHostId)));
        assert!(HostBatch::new("h1", vec![]).is_ok());
    }

    #[test]
    fn test_host_batch_uses_camel_case_host_id() {
        let batch = HostBatch::new("h1", vec![]).unwrap();
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value, json!({ "hostId": "h1", "bots": [] }));
    }
}
