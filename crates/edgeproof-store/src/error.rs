//! Error types for the store module.

use thiserror::Error;

use edgeproof_core::CoreError;

/// Errors that can occur talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network-level failure (connect, timeout, broken transfer).
    #[error("transport error: {0}")]
    Transport(String),

    /// The sink answered with a non-success HTTP status.
    #[error("sink returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The sink reported errors in the response document.
    #[error("sink error: {0}")]
    Sink(String),

    /// The response body was not the expected shape.
    #[error("malformed sink response: {0}")]
    Decode(String),

    /// A returned row could not be parsed as a signed record.
    #[error("malformed record in response: {0}")]
    Record(#[from] CoreError),
}

impl StoreError {
    /// Whether this failure is a network/transport problem.
    ///
    /// The ingest loop pauses after transport failures and moves straight
    /// on after sink-reported ones.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
