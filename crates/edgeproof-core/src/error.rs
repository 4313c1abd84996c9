//! Error types for the edgeproof core.

use thiserror::Error;

/// Core errors that can occur while parsing events or decoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Verification errors for stored records.
///
/// A record is authentic only if the recomputed payload hash matches the
/// stored one AND the embedded signature verifies over the recomputed
/// canonical bytes. The first failing check is named for diagnostics.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("payload hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("embedded public key is not a valid Ed25519 key")]
    BadPublicKey,

    #[error("signature verification failed")]
    SignatureInvalid,
}

impl From<CoreError> for VerificationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidPublicKey => VerificationError::BadPublicKey,
            _ => VerificationError::SignatureInvalid,
        }
    }
}
