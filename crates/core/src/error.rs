//! Error types for Understudy

use thiserror::Error;

use crate::backend::Backend;

/// Result type alias using the Understudy error
pub type Result<T> = std::result::Result<T, Error>;

/// Understudy error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("No procedure registered for '{action}' on the {backend} backend")]
    DispatchFault { action: String, backend: Backend },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("Timed out waiting for {what} after {waited_ms} ms")]
    WaitTimeout { what: String, waited_ms: u64 },

    #[error("Harness misuse: {0}")]
    Harness(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
