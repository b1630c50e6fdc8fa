//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the launcher's pure core and its I/O:
//! the supervised process table, resource sampling, the panel transport,
//! per-bot environment loading and the bot output sink.

use std::collections::HashMap;
use std::time::Instant;

use shared::{HostBatch, LifecycleState, ReporterDirective};

use crate::error::LauncherResult;

/// Read-only view of one supervised bot
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSnapshot {
    pub name: String,
    pub username: Option<String>,
    pub state: LifecycleState,
    pub pid: Option<u32>,
    pub started_at: Instant,
    pub restart_count: u32,
}

/// CPU and memory usage of one OS process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

/// Severity of a line forwarded from a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// Access to the supervisor's process table for reporting
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessTable: Send + Sync {
    /// Snapshot every managed bot, ordered by name
    async fn snapshot(&self) -> Vec<ProcessSnapshot>;
}

/// Resource usage sampling for live processes
#[mockall::automock]
#[async_trait::async_trait]
pub trait ResourceSampler: Send + Sync {
    /// Sample CPU and memory of `pid`
    ///
    /// Fails with `SamplingFailed` when the process exited in the meantime.
    async fn sample(&self, pid: u32) -> LauncherResult<ResourceSample>;
}

/// Transport to the panel backend
#[mockall::automock]
#[async_trait::async_trait]
pub trait PanelClient: Send + Sync {
    /// Push one host batch and return the panel's cadence instruction
    async fn push_status(&self, batch: &HostBatch) -> LauncherResult<ReporterDirective>;

    /// Ask the panel whether any dashboard is currently watching
    async fn should_send(&self) -> LauncherResult<bool>;
}

/// Per-bot environment overrides
#[mockall::automock]
pub trait EnvLoader: Send + Sync {
    /// Load overrides for a bot from its command line
    fn load(&self, command: &[String]) -> LauncherResult<HashMap<String, String>>;
}

/// Sink for lines a bot writes to stdout/stderr
#[mockall::automock]
pub trait LogSink: Send + Sync {
    fn line(&self, bot: &str, level: LogLevel, message: &str);
}
