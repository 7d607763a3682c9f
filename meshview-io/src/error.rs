//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading mesh files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for meshview_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::FileNotFound { path } => meshview_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("mesh file not found: {}", path),
            )),
            IoError::InvalidFormat { format } => meshview_core::Error::UnsupportedFormat(format),
            IoError::ParseError { path, message } => meshview_core::Error::Parse { path, message },
            IoError::Io(e) => meshview_core::Error::Io(e),
        }
    }
}
