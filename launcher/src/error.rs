//! Launcher-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Configuration file not found: {path}")]
    ConfigMissing { path: String },

    #[error("Failed to read configuration {path}: {message}")]
    ConfigRead { path: String, message: String },

    #[error("Failed to spawn bot {name}: {message}")]
    SpawnFailed { name: String, message: String },

    #[error("Process {pid} is no longer available for sampling")]
    SamplingFailed { pid: u32 },

    #[error("Invalid environment file {path}: {message}")]
    EnvFileError { path: String, message: String },

    #[error("Panel communication failed: {message}")]
    TransportError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LauncherError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError { message: message.into() }
    }

    pub fn spawn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SpawnFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for LauncherError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

pub type LauncherResult<T> = Result<T, LauncherError>;
