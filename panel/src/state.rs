//! Panel shared state
//!
//! The store and the gate each sit behind their own mutex. Reads sweep and
//! snapshot the store under a single lock acquisition.

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;

use shared::ReporterDirective;

use crate::core::activity::DEFAULT_HEARTBEAT_WINDOW;
use crate::core::aggregation::DEFAULT_STALE_AFTER;
use crate::core::{ActivityGate, AggregationStore, StatusBatch};

/// Default sleep handed to reporters while nobody is watching
pub const DEFAULT_SLEEP: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub stale_after: Duration,
    pub heartbeat_window: Duration,
    pub sleep_duration: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
            heartbeat_window: DEFAULT_HEARTBEAT_WINDOW,
            sleep_duration: DEFAULT_SLEEP,
        }
    }
}

#[derive(Debug)]
pub struct PanelState {
    store: Mutex<AggregationStore>,
    gate: Mutex<ActivityGate>,
    config: PanelConfig,
    started_at: Instant,
}

impl PanelState {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            store: Mutex::new(AggregationStore::new(config.stale_after)),
            gate: Mutex::new(ActivityGate::new(config.heartbeat_window)),
            config,
            started_at: Instant::now(),
        }
    }

    pub async fn record_heartbeat(&self) {
        self.gate.lock().await.record_heartbeat(Instant::now());
    }

    pub async fn is_active(&self) -> bool {
        self.gate.lock().await.is_active(Instant::now())
    }

    /// Store a validated batch and pick the reporter's next cadence
    pub async fn ingest(&self, batch: StatusBatch) -> ReporterDirective {
        let now = Instant::now();
        self.store.lock().await.ingest(batch.host_id, batch.bots, now);

        if self.gate.lock().await.is_active(now) {
            ReporterDirective::Poll
        } else {
            ReporterDirective::Sleep {
                duration: self.config.sleep_duration.as_secs(),
            }
        }
    }

    pub async fn read_all(&self) -> Vec<Value> {
        self.store.lock().await.read_all(Instant::now())
    }

    pub async fn host_count(&self) -> usize {
        self.store.lock().await.host_count()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}
