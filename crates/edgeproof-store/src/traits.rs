//! RecordStore trait: the abstract interface to the signed-record store.
//!
//! The store is content-addressed: submitting byte-identical content twice
//! is an idempotent no-op, not an error. Implementations are the GraphQL
//! endpoint (primary) and in-memory (for tests).

use async_trait::async_trait;

use edgeproof_core::SignedRecord;

use crate::error::Result;

/// Result of submitting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record was stored; the store assigned it a document identifier.
    Stored {
        /// Content-derived document identifier.
        doc_id: String,
    },
    /// Identical record already exists (idempotent - not an error).
    AlreadyExists,
}

/// The RecordStore trait: async interface to the record sink/source.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Submit one signed record.
    ///
    /// A content-addressed collision with an existing identical record
    /// returns `AlreadyExists`.
    async fn submit(&self, record: &SignedRecord) -> Result<SubmitOutcome>;

    /// Fetch up to `limit` of the most recent records, ordered by
    /// timestamp ascending.
    async fn recent(&self, limit: usize) -> Result<Vec<SignedRecord>>;
}

/// Shared handles are stores too; an ingest loop and a verifier can audit
/// the same in-memory store in one test process.
#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    async fn submit(&self, record: &SignedRecord) -> Result<SubmitOutcome> {
        (**self).submit(record).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SignedRecord>> {
        (**self).recent(limit).await
    }
}
