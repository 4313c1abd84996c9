//! # edgeproof-core
//!
//! Pure primitives for edgeproof: canonical payloads, hashing, signing,
//! and record verification.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`RawEvent`] - One parsed line of sensor output
//! - [`CanonicalPayload`] - The fixed four-field subset that gets signed
//! - [`SignedRecord`] - Payload plus hash, signature, and public key
//! - [`Keypair`] - The device's Ed25519 signing identity
//!
//! ## Canonicalization
//!
//! Payloads are encoded as canonical JSON: compact, keys sorted. See the
//! [`canonical`] module — the byte-level encoding is the protocol.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod event;
pub mod record;
pub mod verify;

pub use canonical::to_canonical_bytes;
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash};
pub use error::{CoreError, VerificationError};
pub use event::{CanonicalPayload, RawEvent, CANONICAL_FIELDS};
pub use record::SignedRecord;
pub use verify::verify_record;
