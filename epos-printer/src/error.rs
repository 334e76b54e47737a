//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network or transport error while reaching the printer
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Printer service answered with a non-success HTTP status
    #[error("Printer returned HTTP status {0}")]
    Status(u16),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
