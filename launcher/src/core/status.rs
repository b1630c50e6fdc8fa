//! Status record construction

use std::time::Instant;

use shared::{LifecycleState, StatusRecord};

use crate::error::LauncherResult;
use crate::traits::{ProcessSnapshot, ResourceSample};

/// Build the record reported for one bot
///
/// `sample` is `None` for bots that were not sampled (not running). A failed
/// sample means the process vanished between snapshot and sampling, which is
/// reported as `error` instead of aborting the batch.
pub fn build_record(
    snapshot: &ProcessSnapshot,
    sample: Option<LauncherResult<ResourceSample>>,
    now: Instant,
) -> StatusRecord {
    match sample {
        Some(Ok(sample)) => StatusRecord {
            name: snapshot.name.clone(),
            username: snapshot.username.clone(),
            status: snapshot.state,
            pid: snapshot.pid,
            cpu: sample.cpu_percent,
            memory: sample.memory_bytes,
            uptime: now.saturating_duration_since(snapshot.started_at).as_secs(),
        },
        Some(Err(_)) => StatusRecord::idle(&snapshot.name, snapshot.username.clone(), LifecycleState::Errored),
        None => StatusRecord::idle(&snapshot.name, snapshot.username.clone(), snapshot.state),
    }
}
