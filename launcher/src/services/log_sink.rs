//! Bot output sink writing through tracing
//!
//! Lines are emitted under the `bot` target so they can be filtered apart
//! from the launcher's own logs.

use shared::logging::BOT_TARGET;

use crate::traits::{LogLevel, LogSink};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingLogSink {
    fn line(&self, bot: &str, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: BOT_TARGET, bot = %bot, "{}", message),
            LogLevel::Error => tracing::error!(target: BOT_TARGET, bot = %bot, "{}", message),
        }
    }
}
