//! Message types exchanged over the panel HTTP API
//!
//! - `status`: per-bot status records and the per-host batch
//! - `panel`: panel responses driving the launcher's reporting cadence

pub mod panel;
pub mod status;

pub use panel::{HeartbeatAck, ReporterDirective, SendGate};
pub use status::{HostBatch, LifecycleState, StatusRecord};
