#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

/// Error code constants for type-safe error handling
pub mod code {
    pub const INVALID: &str = "INVALID";
    pub const DEPENDENCY: &str = "DEPENDENCY";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Setup-time failures of the dispatch layer.
///
/// Remote-call failures never surface here; they are carried as
/// `Outcome::Failure(ErrorKind)`.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DispatchError {
    /// Returns the protocol error code for this error
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => code::INVALID,
            Self::RuntimeError(_) | Self::IoError(_) => code::DEPENDENCY,
            Self::TelemetryError(_) => code::INTERNAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
