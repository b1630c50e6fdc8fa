//! Status panel backend
//!
//! Aggregates per-bot status pushed by launcher hosts and tells launchers
//! whether a dashboard is currently watching.

pub mod core;
pub mod error;
pub mod panel_impl;
pub mod state;
pub mod web;

// Re-export main types
pub use error::{PanelError, PanelResult};
pub use panel_impl::{build_router, PanelServer};
pub use state::{PanelConfig, PanelState};
