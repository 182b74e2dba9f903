//! Crate-wide error type.
//!
//! Every failure carries a category ([`ErrorKind`]) so batch callers can report
//! "data unavailable" separately from "integration failed", plus a process exit
//! code for the `qnm` binary:
//!
//! - `2`: invalid input, bad configuration, output I/O
//! - `3`: observed data missing/malformed or ringdown window too short
//! - `4`: numerical failures (evidence integration, point fit)

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("ringdown window too short: {samples} samples (need at least {required})")]
    WindowTooShort { samples: usize, required: usize },

    #[error("evidence integration failed: {0}")]
    Integration(String),

    #[error("point fit failed: {0}")]
    Fit(String),

    #[error("i/o error: {0}")]
    Io(String),
}

/// Stable failure classification (used in batch summaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Config,
    DataUnavailable,
    WindowTooShort,
    Integration,
    Fit,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Config => "config",
            ErrorKind::DataUnavailable => "data_unavailable",
            ErrorKind::WindowTooShort => "window_too_short",
            ErrorKind::Integration => "integration",
            ErrorKind::Fit => "fit",
            ErrorKind::Io => "io",
        }
    }
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        AppError::DataUnavailable(message.into())
    }

    pub fn integration(message: impl Into<String>) -> Self {
        AppError::Integration(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        AppError::Io(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Config(_) => ErrorKind::Config,
            AppError::DataUnavailable(_) => ErrorKind::DataUnavailable,
            AppError::WindowTooShort { .. } => ErrorKind::WindowTooShort,
            AppError::Integration(_) => ErrorKind::Integration,
            AppError::Fit(_) => ErrorKind::Fit,
            AppError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::InvalidInput | ErrorKind::Config | ErrorKind::Io => 2,
            ErrorKind::DataUnavailable | ErrorKind::WindowTooShort => 3,
            ErrorKind::Integration | ErrorKind::Fit => 4,
        }
    }
}
