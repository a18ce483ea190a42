//! # Error Types
//!
//! Custom error types for padframe using `thiserror`.

use thiserror::Error;

/// Main error type for padframe
#[derive(Debug, Error)]
pub enum PadError {
    /// No device answers at the given slot
    #[error("No controller connected at slot {0}")]
    DeviceNotConnected(u32),

    /// The driver cannot perform the requested operation
    #[error("Unsupported by driver: {0}")]
    Unsupported(String),

    /// Driver-level failures (ioctl errors, effect upload, ...)
    #[error("Driver error: {0}")]
    Driver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for padframe
pub type Result<T> = std::result::Result<T, PadError>;
