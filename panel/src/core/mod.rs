//! Core panel logic
//!
//! Synchronous state that the HTTP layer drives. Every operation takes the
//! current instant explicitly so expiry can be tested without waiting.

pub mod activity;
pub mod aggregation;
pub mod validation;

pub use activity::ActivityGate;
pub use aggregation::AggregationStore;
pub use validation::{validate_batch, BotRecord, StatusBatch};
