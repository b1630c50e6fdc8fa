//! Reporter duty cycle
//!
//! Two states: `Polling` at the fixed interval, or `Sleeping` until a single
//! wake instant chosen by the panel. Arming a new sleep replaces the old wake.

use std::time::{Duration, Instant};

use shared::ReporterDirective;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Polling,
    Sleeping { until: Instant },
}

#[derive(Debug, Clone)]
pub struct DutyCycle {
    interval: Duration,
    phase: CyclePhase,
}

impl DutyCycle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            phase: CyclePhase::Polling,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Apply the panel's directive from the latest push
    pub fn apply(&mut self, directive: ReporterDirective, now: Instant) {
        self.phase = match directive.sleep_duration() {
            Some(duration) => CyclePhase::Sleeping { until: now + duration },
            None => CyclePhase::Polling,
        };
    }

    /// Delay until the next cycle
    ///
    /// Consumes a pending wake: after sleeping once, ticking resumes at the
    /// normal interval unless the panel says otherwise.
    pub fn next_delay(&mut self, now: Instant) -> Duration {
        match self.phase {
            CyclePhase::Polling => self.interval,
            CyclePhase::Sleeping { until } => {
                self.phase = CyclePhase::Polling;
                until.saturating_duration_since(now)
            }
        }
    }
}
