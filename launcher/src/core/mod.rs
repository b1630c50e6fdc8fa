//! Core launcher logic
//!
//! Pure, synchronous pieces that the services drive: configuration parsing,
//! the lifecycle state machine, the reporter duty cycle and status records.

pub mod config;
pub mod duty_cycle;
pub mod lifecycle;
pub mod status;

pub use config::{load_config, parse_config, BotSpec};
pub use duty_cycle::{CyclePhase, DutyCycle};
pub use lifecycle::{on_exit, Effect, ExitOutcome, Transition};
pub use status::build_record;
