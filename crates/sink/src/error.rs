//! Sink error types

use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors a persistence collaborator can surface.
///
/// The flush engine catches these per batch: the failure is logged with the
/// count of lost records and the cycle continues with the next batch.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The backend rejected or failed to store a batch
    #[error("persist failed: {0}")]
    Persist(String),

    /// I/O error from a file- or network-backed provider
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is no longer reachable
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl SinkError {
    /// Create a persist error
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_error_display() {
        let err = SinkError::persist("table missing");
        assert!(err.to_string().contains("table missing"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: SinkError = io.into();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
