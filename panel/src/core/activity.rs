//! Dashboard activity tracking

use std::time::{Duration, Instant};

/// Default window a heartbeat keeps the panel active
pub const DEFAULT_HEARTBEAT_WINDOW: Duration = Duration::from_secs(20);

/// Whether a dashboard has checked in recently
///
/// Nothing is ever swept; activity is computed from the last heartbeat on
/// every read. The panel is inactive until the first heartbeat arrives.
#[derive(Debug, Clone)]
pub struct ActivityGate {
    last_heartbeat: Option<Instant>,
    window: Duration,
}

impl ActivityGate {
    pub fn new(window: Duration) -> Self {
        Self {
            last_heartbeat: None,
            window,
        }
    }

    pub fn record_heartbeat(&mut self, now: Instant) {
        self.last_heartbeat = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.last_heartbeat
            .map(|last| now.saturating_duration_since(last) < self.window)
            .unwrap_or(false)
    }
}

impl Default for ActivityGate {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_WINDOW)
    }
}
