//! # edgeproof
//!
//! Tamper-evident sensor records from untrusted edge devices.
//!
//! Two long-running processes share this crate:
//!
//! - **Ingest** ([`ingest::IngestPipeline`]): reads newline-delimited JSON
//!   events from a device, canonicalizes and signs each one, and submits
//!   the signed record to a content-addressed store.
//! - **Verify** ([`verifier::Verifier`]): polls the store and independently
//!   re-derives every proof, reporting `OK`/`FAIL` per record.
//!
//! Both loops are single-threaded and sequential; their state (`last_hash`,
//! `last_timestamp`, the keypair) lives on the loop structs, so several
//! independent instances can run in one test process.
//!
//! The trust model is trust-on-first-use: a record carries its signer's
//! public key, so verification proves internal consistency (hash and
//! signature agree with the payload), not that the signer is the claimed
//! device.
//!
//! ## Re-exports
//!
//! - `edgeproof::core` - protocol primitives (payloads, records, keys)
//! - `edgeproof::store` - the record store seam

pub mod config;
pub mod ingest;
pub mod keystore;
pub mod source;
pub mod verifier;

// Re-export component crates
pub use edgeproof_core as core;
pub use edgeproof_store as store;

// Re-export main types for convenience
pub use config::Config;
pub use ingest::{IngestOutcome, IngestPipeline};
pub use keystore::load_or_create;
pub use source::{EventSource, LineSource, VecSource};
pub use verifier::{Verifier, VerifyReport};

pub use edgeproof_core::{
    verify_record, CanonicalPayload, Ed25519PublicKey, Ed25519Signature, Keypair, RawEvent,
    Sha256Hash, SignedRecord, VerificationError,
};
pub use edgeproof_store::{GraphqlStore, MemoryStore, RecordStore, SubmitOutcome};
