//! Shared types for the bot fleet launcher and status panel
//!
//! Contains the wire types exchanged between launcher hosts and the panel
//! backend, plus logging helpers used by both binaries.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Launcher → Panel reporting
    HostBatch, LifecycleState, StatusRecord,

    // Panel responses
    HeartbeatAck, ReporterDirective, SendGate,
};
