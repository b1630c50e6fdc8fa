//! Panel responses to launcher and dashboard calls

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instruction returned by `POST /api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ReporterDirective {
    /// Someone is watching; keep reporting at the normal interval
    Poll,
    /// No reader; stay quiet for `duration` seconds
    Sleep { duration: u64 },
}

impl ReporterDirective {
    pub fn sleep_duration(&self) -> Option<Duration> {
        match self {
            ReporterDirective::Poll => None,
            ReporterDirective::Sleep { duration } => Some(Duration::from_secs(*duration)),
        }
    }
}

/// Response to `POST /api/heartbeat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatAck {
    pub success: bool,
}

/// Response to `GET /api/should_send_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendGate {
    #[serde(rename = "shouldSend")]
    pub should_send: bool,
}
