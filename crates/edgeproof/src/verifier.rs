//! The verification loop: an always-on auditor over the record store.
//!
//! Polls the store on a fixed interval and independently re-derives every
//! proof. Failures are reported, never fatal. The high-water mark advances
//! past failed records too: a record is reported once, pass or fail, and a
//! transient failure is never retried.

use std::time::Duration;

use edgeproof_core::{verify_record, SignedRecord, VerificationError};
use edgeproof_store::{RecordStore, StoreError};

/// Result of re-verifying one stored record.
#[derive(Debug)]
pub struct VerifyReport {
    pub record: SignedRecord,
    pub outcome: Result<(), VerificationError>,
}

impl VerifyReport {
    /// Whether both the hash and the signature checked out.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// The verification loop state: the store handle and the timestamp
/// high-water mark.
pub struct Verifier<S> {
    store: S,
    poll_limit: usize,
    last_timestamp: f64,
}

impl<S: RecordStore> Verifier<S> {
    pub fn new(store: S, poll_limit: usize) -> Self {
        Self {
            store,
            poll_limit,
            last_timestamp: f64::NEG_INFINITY,
        }
    }

    /// The largest timestamp already processed.
    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    /// One audit pass: fetch, filter to unseen records, re-verify each.
    pub async fn poll_once(&mut self) -> Result<Vec<VerifyReport>, StoreError> {
        let rows = self.store.recent(self.poll_limit).await?;
        if rows.is_empty() {
            tracing::debug!("no records yet");
        }

        let mut reports = Vec::new();
        let mut max_seen = self.last_timestamp;

        for record in rows {
            let Some(ts) = record.payload.timestamp_f64() else {
                // Without a numeric timestamp the high-water mark cannot
                // place this record; skip it rather than abort the poll.
                tracing::debug!("record without numeric timestamp skipped");
                continue;
            };
            if ts <= self.last_timestamp {
                continue;
            }
            max_seen = max_seen.max(ts);

            let outcome = verify_record(&record);
            reports.push(VerifyReport { record, outcome });
        }

        self.last_timestamp = max_seen;
        Ok(reports)
    }

    /// Poll forever on a fixed interval, logging one status line per
    /// verified record. Store errors are logged and the next poll retried.
    pub async fn run(&mut self, interval: Duration) {
        loop {
            match self.poll_once().await {
                Ok(reports) => {
                    for report in &reports {
                        log_report(report);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "poll failed");
                }
            }
            tokio::time::sleep(interval).await;
        }
    }
}

/// One status line per verified record.
fn log_report(report: &VerifyReport) {
    let payload = &report.record.payload;
    match &report.outcome {
        Ok(()) => {
            tracing::info!(
                status = "OK",
                device = payload.device_id_str().unwrap_or("?"),
                timestamp = payload.timestamp_f64(),
                prediction = payload.prediction_str().unwrap_or("?"),
                probability = payload.probability_f64(),
                "record verified"
            );
        }
        Err(e) => {
            tracing::warn!(
                status = "FAIL",
                device = payload.device_id_str().unwrap_or("?"),
                timestamp = payload.timestamp_f64(),
                check = %e,
                "record failed verification"
            );
        }
    }
}
