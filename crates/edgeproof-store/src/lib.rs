//! # edgeproof-store
//!
//! The record store seam: submitting signed records to, and reading them
//! back from, a content-addressed document store.
//!
//! The primary implementation is [`GraphqlStore`], speaking to a
//! GraphQL-shaped endpoint. [`MemoryStore`] provides the same semantics in
//! memory for tests, including fault injection.
//!
//! Submitting byte-identical content twice is an idempotent no-op
//! ([`SubmitOutcome::AlreadyExists`]), never an error.

pub mod error;
pub mod graphql;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use graphql::GraphqlStore;
pub use memory::MemoryStore;
pub use traits::{RecordStore, SubmitOutcome};
