//! Common error types for LoanTrail

use thiserror::Error;

/// Common result type for LoanTrail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across LoanTrail crates
#[derive(Error, Debug)]
pub enum Error {
    /// Required field missing or invalid on manual entry
    #[error("Validation error: {0}")]
    Validation(String),

    /// Imported document is not valid JSON or not an array of leads
    #[error("Import format error: {0}")]
    ImportFormat(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Durable storage read/write error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
