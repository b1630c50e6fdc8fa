//! Periodic status reporter
//!
//! A single task owns the loop, so at most one cycle is ever in flight.
//! Each cycle snapshots the process table, samples live bots, pushes the
//! batch to the panel and feeds the returned directive to the duty cycle.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use shared::{
    service_debug, service_info, service_warn, HostBatch, ReporterDirective, ServiceId, SharedError,
};

use crate::core::status::build_record;
use crate::core::DutyCycle;
use crate::error::LauncherResult;
use crate::traits::{PanelClient, ProcessTable, ResourceSampler};

/// Default time between cycles while the panel is watched
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub host_id: String,
    pub interval: Duration,
    /// Ask the panel whether anyone is watching before building a batch
    pub check_before_send: bool,
}

impl ReporterConfig {
    pub fn validate(&self) -> LauncherResult<()> {
        if self.host_id.trim().is_empty() {
            return Err(SharedError::EmptyHostId.into());
        }
        if self.interval.is_zero() {
            return Err(SharedError::InvalidConfig {
                field: "interval".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Result of one reporting cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The panel is not being watched, nothing was sent
    Skipped,
    /// A batch was accepted
    Sent {
        records: usize,
        directive: ReporterDirective,
    },
    /// The push failed; the next cycle runs at the usual cadence
    Failed,
}

pub struct StatusReporter<T, S, C> {
    table: T,
    sampler: S,
    client: C,
    config: ReporterConfig,
}

impl<T, S, C> StatusReporter<T, S, C>
where
    T: ProcessTable,
    S: ResourceSampler,
    C: PanelClient,
{
    pub fn new(table: T, sampler: S, client: C, config: ReporterConfig) -> LauncherResult<Self> {
        config.validate()?;
        Ok(Self {
            table,
            sampler,
            client,
            config,
        })
    }

    /// Snapshot the table and sample every running bot
    pub async fn build_batch(&self) -> LauncherResult<HostBatch> {
        let snapshots = self.table.snapshot().await;
        let mut records = Vec::with_capacity(snapshots.len());

        for snapshot in &snapshots {
            let sample = match (snapshot.state.is_running(), snapshot.pid) {
                (true, Some(pid)) => Some(self.sampler.sample(pid).await),
                _ => None,
            };
            if let Some(Err(e)) = &sample {
                service_debug!(ServiceId::current(), bot = %snapshot.name, error = %e, "Sampling failed");
            }
            records.push(build_record(snapshot, sample, Instant::now()));
        }

        Ok(HostBatch::new(self.config.host_id.clone(), records)?)
    }

    /// Run one reporting cycle
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self.config.check_before_send {
            match self.client.should_send().await {
                Ok(true) => {}
                Ok(false) => {
                    service_debug!(ServiceId::current(), "Panel idle, skipping report");
                    return CycleOutcome::Skipped;
                }
                Err(e) => {
                    service_warn!(ServiceId::current(), error = %e, "⚠️ Panel pre-check failed, skipping report");
                    return CycleOutcome::Skipped;
                }
            }
        }

        let batch = match self.build_batch().await {
            Ok(batch) => batch,
            Err(e) => {
                service_warn!(ServiceId::current(), error = %e, "⚠️ Could not build status batch");
                return CycleOutcome::Failed;
            }
        };

        match self.client.push_status(&batch).await {
            Ok(directive) => {
                service_debug!(
                    ServiceId::current(),
                    records = batch.bots.len(),
                    directive = ?directive,
                    "📊 Status pushed"
                );
                CycleOutcome::Sent {
                    records: batch.bots.len(),
                    directive,
                }
            }
            Err(e) => {
                service_warn!(ServiceId::current(), error = %e, "⚠️ Status push failed");
                CycleOutcome::Failed
            }
        }
    }

    /// Report until `shutdown_rx` fires or its sender is dropped
    ///
    /// The first cycle runs immediately.
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        let mut duty = DutyCycle::new(self.config.interval);
        service_info!(
            ServiceId::current(),
            host_id = %self.config.host_id,
            interval_secs = self.config.interval.as_secs(),
            "📡 Status reporter started"
        );

        loop {
            if let CycleOutcome::Sent { directive, .. } = self.run_cycle().await {
                if let Some(duration) = directive.sleep_duration() {
                    service_info!(
                        ServiceId::current(),
                        sleep_secs = duration.as_secs(),
                        "💤 Panel idle, reporter sleeping"
                    );
                }
                duty.apply(directive, Instant::now());
            }

            let delay = duty.next_delay(Instant::now());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.recv() => break,
            }
        }

        service_info!(ServiceId::current(), "📡 Status reporter stopped");
    }
}
