//! Error types for the control server

use thiserror::Error;

use crate::config::Violation;
use crate::device::DeviceStatus;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device registry errors
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(u32),

    #[error("Device {id} is {status} and cannot be activated")]
    InvalidTransition { id: u32, status: DeviceStatus },

    #[error("Device scan produced no devices")]
    ScanFailed,
}

/// Configuration store errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid audio configuration: {}", format_violations(.0))]
    Invalid(Vec<Violation>),

    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;
