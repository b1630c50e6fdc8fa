//! Process resource sampling backed by sysinfo
//!
//! A single `System` is kept for the launcher's lifetime. CPU usage is a
//! delta between two refreshes, so the first sample of a new pid reads 0%.

use std::sync::Arc;

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, System};
use tokio::sync::Mutex;

use crate::error::{LauncherError, LauncherResult};
use crate::traits::{ResourceSample, ResourceSampler};

#[derive(Clone)]
pub struct SysinfoSampler {
    system: Arc<Mutex<System>>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceSampler for SysinfoSampler {
    async fn sample(&self, pid: u32) -> LauncherResult<ResourceSample> {
        let mut system = self.system.lock().await;
        let sys_pid = Pid::from_u32(pid);

        let refresh = ProcessRefreshKind::new().with_cpu().with_memory();
        if !system.refresh_process_specifics(sys_pid, refresh) {
            return Err(LauncherError::SamplingFailed { pid });
        }

        let process = system
            .process(sys_pid)
            .ok_or(LauncherError::SamplingFailed { pid })?;

        Ok(ResourceSample {
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
        })
    }
}
