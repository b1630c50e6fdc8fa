//! Bot fleet launcher
//!
//! Runs a set of long-lived bot programs from a configuration file, restarts
//! them when they crash and periodically reports per-bot status to a panel
//! backend.

pub mod core;
pub mod error;
pub mod fleet;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use core::{BotSpec, DutyCycle};
pub use error::{LauncherError, LauncherResult};
pub use fleet::{Fleet, FleetConfig};
pub use traits::{EnvLoader, LogSink, PanelClient, ProcessTable, ResourceSampler};
