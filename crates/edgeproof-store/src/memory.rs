//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing. It has the same submit semantics as the
//! GraphQL store (content-addressed, idempotent) but keeps everything in
//! memory, and can inject failures to exercise the ingest/verify loops'
//! error paths.

use std::sync::RwLock;

use async_trait::async_trait;

use edgeproof_core::{to_canonical_bytes, Sha256Hash, SignedRecord};

use crate::error::{Result, StoreError};
use crate::traits::{RecordStore, SubmitOutcome};

/// In-memory record store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Stored records with their content-derived document IDs, in
    /// submission order.
    records: Vec<StoredRecord>,

    /// Number of submit calls received, including failed ones.
    submit_calls: usize,

    /// Failures to return from upcoming submit calls, in order.
    submit_faults: Vec<StoreError>,

    /// Failures to return from upcoming recent calls, in order.
    recent_faults: Vec<StoreError>,
}

struct StoredRecord {
    doc_id: String,
    record: SignedRecord,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: Vec::new(),
                submit_calls: 0,
                submit_faults: Vec::new(),
                recent_faults: Vec::new(),
            }),
        }
    }

    /// Queue an error for the next submit call.
    pub fn fail_next_submit(&self, error: StoreError) {
        self.inner.write().unwrap().submit_faults.push(error);
    }

    /// Queue an error for the next recent call.
    pub fn fail_next_recent(&self, error: StoreError) {
        self.inner.write().unwrap().recent_faults.push(error);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    /// Number of submit calls received, including failed ones.
    pub fn submit_calls(&self) -> usize {
        self.inner.read().unwrap().submit_calls
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all stored records in submission order.
    pub fn records(&self) -> Vec<SignedRecord> {
        self.inner
            .read()
            .unwrap()
            .records
            .iter()
            .map(|sr| sr.record.clone())
            .collect()
    }

    /// Overwrite a stored record in place, bypassing submission.
    ///
    /// Tamper hook for verifier tests: the store keeps the old document ID,
    /// like an attacker editing a stored document would.
    pub fn replace(&self, index: usize, record: SignedRecord) {
        let mut inner = self.inner.write().unwrap();
        inner.records[index].record = record;
    }

    fn doc_id(record: &SignedRecord) -> String {
        Sha256Hash::hash(&to_canonical_bytes(&record.to_input())).to_hex()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn submit(&self, record: &SignedRecord) -> Result<SubmitOutcome> {
        let mut inner = self.inner.write().unwrap();
        inner.submit_calls += 1;

        if !inner.submit_faults.is_empty() {
            return Err(inner.submit_faults.remove(0));
        }

        let doc_id = Self::doc_id(record);
        if inner.records.iter().any(|sr| sr.doc_id == doc_id) {
            return Ok(SubmitOutcome::AlreadyExists);
        }

        inner.records.push(StoredRecord {
            doc_id: doc_id.clone(),
            record: record.clone(),
        });
        Ok(SubmitOutcome::Stored { doc_id })
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SignedRecord>> {
        let mut inner = self.inner.write().unwrap();

        if !inner.recent_faults.is_empty() {
            return Err(inner.recent_faults.remove(0));
        }

        let mut records: Vec<SignedRecord> =
            inner.records.iter().map(|sr| sr.record.clone()).collect();
        records.sort_by(|a, b| {
            let ta = a.payload.timestamp_f64().unwrap_or(f64::NEG_INFINITY);
            let tb = b.payload.timestamp_f64().unwrap_or(f64::NEG_INFINITY);
            ta.total_cmp(&tb)
        });

        // Most recent `limit`, still in ascending order.
        let skip = records.len().saturating_sub(limit);
        Ok(records.split_off(skip))
    }
}
