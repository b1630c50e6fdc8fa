//! Service implementations
//!
//! Real implementations of the launcher traits. These own all process, file
//! and network I/O.

pub mod env_file;
pub mod log_sink;
pub mod output_handler;
pub mod panel_client;
pub mod reporter;
pub mod sampler;
pub mod supervisor;

pub use env_file::DotenvLoader;
pub use log_sink::TracingLogSink;
pub use panel_client::HttpPanelClient;
pub use reporter::{CycleOutcome, ReporterConfig, StatusReporter};
pub use sampler::SysinfoSampler;
pub use supervisor::RealSupervisor;
