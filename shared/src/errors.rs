//! Shared error types for the launcher and panel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Host id must not be empty")]
    EmptyHostId,

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
