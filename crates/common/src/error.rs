//! Unified error type for slopescout.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("upstream returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Transient failures worth a bounded retry. Client errors (4xx) and
    /// malformed bodies are permanent and retrying them only adds load.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Http(_) => true,
            Error::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Timeout("5s".into()).is_retryable());
        assert!(Error::Http("connection reset".into()).is_retryable());
        assert!(Error::HttpStatus { status: 503, message: String::new() }.is_retryable());
        assert!(!Error::HttpStatus { status: 404, message: String::new() }.is_retryable());
        assert!(!Error::Malformed("bad shape".into()).is_retryable());
        assert!(!Error::NotFound("r-1".into()).is_retryable());
    }
}
