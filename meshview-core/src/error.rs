//! Error types for meshview

use thiserror::Error;

/// Main error type for meshview operations
///
/// Display strings are what the host sees, so they stay short and
/// free of backend detail. Backend diagnostics belong in the log.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("No supported rendering backend available")]
    NoBackend,

    #[error("Render surface error: {0}")]
    Surface(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Render context is not initialized")]
    NotInitialized,

    #[error("Preview disabled: {0}")]
    Disabled(String),
}

impl Error {
    /// Whether the render context can still serve another `load_mesh` call
    /// after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::NoBackend | Error::Disabled(_) | Error::NotInitialized)
    }
}

/// Result type alias for meshview operations
pub type Result<T> = std::result::Result<T, Error>;
