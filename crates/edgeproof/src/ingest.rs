//! The ingest pipeline: raw lines in, signed records out.
//!
//! Each line is handled in one iteration with an explicit outcome; nothing
//! escapes the iteration boundary. The loop never dies on a bad event —
//! the only way out is the source ending or an external interrupt.
//!
//! Validation is presence-only: a `probability` out of range or a
//! `timestamp` of the wrong type is signed faithfully and will later
//! verify as OK.

use std::time::Duration;

use edgeproof_core::{CanonicalPayload, Keypair, RawEvent, Sha256Hash, SignedRecord};
use edgeproof_store::{RecordStore, SubmitOutcome};

use crate::source::{EventSource, SourceError};

/// What happened to one input line.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Record sealed and stored.
    Submitted { hash: Sha256Hash, doc_id: String },
    /// Identical record already in the store (content-addressed collision,
    /// benign).
    StoreDuplicate { hash: Sha256Hash },
    /// Same hash as the previous accepted event; not forwarded. Only
    /// back-to-back repeats are caught — this is not global de-dup.
    SuppressedDuplicate { hash: Sha256Hash },
    /// Empty input line.
    SkippedEmpty,
    /// Line did not parse as a JSON object.
    SkippedMalformed,
    /// A required field was absent.
    SkippedIncomplete { missing: Vec<&'static str> },
    /// The sink rejected the record; the event is dropped, the loop
    /// continues.
    SinkRejected { hash: Sha256Hash, reason: String },
    /// Network failure talking to the sink; the event is dropped and the
    /// loop pauses briefly before the next line.
    TransportFailed { hash: Sha256Hash, reason: String },
}

impl IngestOutcome {
    /// Whether the loop should pause before reading the next line.
    pub fn needs_pause(&self) -> bool {
        matches!(self, IngestOutcome::TransportFailed { .. })
    }
}

/// The ingest loop state: the signing identity, the sink, and the hash of
/// the most recently accepted event.
pub struct IngestPipeline<S> {
    keypair: Keypair,
    store: S,
    last_hash: Option<Sha256Hash>,
    error_pause: Duration,
}

impl<S: RecordStore> IngestPipeline<S> {
    pub fn new(keypair: Keypair, store: S, error_pause: Duration) -> Self {
        Self {
            keypair,
            store,
            last_hash: None,
            error_pause,
        }
    }

    /// Hash of the most recently accepted event, if any.
    pub fn last_hash(&self) -> Option<Sha256Hash> {
        self.last_hash
    }

    /// Handle one input line end to end.
    pub async fn process_line(&mut self, line: &str) -> IngestOutcome {
        let line = line.trim();
        if line.is_empty() {
            return IngestOutcome::SkippedEmpty;
        }

        let event = match RawEvent::parse(line) {
            Ok(event) => event,
            Err(_) => return IngestOutcome::SkippedMalformed,
        };

        let missing = event.missing_fields();
        if !missing.is_empty() {
            return IngestOutcome::SkippedIncomplete { missing };
        }

        let payload = CanonicalPayload::from_event(&event);
        let hash = payload.hash();

        if self.last_hash == Some(hash) {
            return IngestOutcome::SuppressedDuplicate { hash };
        }
        // The duplicate filter advances even when submission fails below.
        self.last_hash = Some(hash);

        tracing::debug!(
            device = payload.device_id_str().unwrap_or("?"),
            timestamp = payload.timestamp_f64(),
            prediction = payload.prediction_str().unwrap_or("?"),
            probability = payload.probability_f64(),
            "event accepted"
        );

        let record = SignedRecord::seal(payload, &self.keypair);
        match self.store.submit(&record).await {
            Ok(SubmitOutcome::Stored { doc_id }) => IngestOutcome::Submitted { hash, doc_id },
            Ok(SubmitOutcome::AlreadyExists) => IngestOutcome::StoreDuplicate { hash },
            Err(e) if e.is_transport() => IngestOutcome::TransportFailed {
                hash,
                reason: e.to_string(),
            },
            Err(e) => IngestOutcome::SinkRejected {
                hash,
                reason: e.to_string(),
            },
        }
    }

    /// Drive the loop until the source ends.
    ///
    /// Interruption is cooperative: callers race this future against a
    /// shutdown signal; in-flight sink calls are not cancelled mid-flight,
    /// they time out.
    pub async fn run(&mut self, source: &mut dyn EventSource) -> Result<(), SourceError> {
        while let Some(line) = source.next_line().await? {
            let outcome = self.process_line(&line).await;
            log_outcome(&outcome);
            if outcome.needs_pause() {
                tokio::time::sleep(self.error_pause).await;
            }
        }
        Ok(())
    }
}

/// One status line per processed event.
fn log_outcome(outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Submitted { hash, doc_id } => {
            tracing::info!(%hash, %doc_id, "record stored");
        }
        IngestOutcome::StoreDuplicate { hash } => {
            tracing::info!(%hash, "identical record already stored, skipping");
        }
        IngestOutcome::SuppressedDuplicate { hash } => {
            tracing::debug!(%hash, "consecutive duplicate suppressed");
        }
        IngestOutcome::SkippedEmpty => {}
        IngestOutcome::SkippedMalformed => {
            tracing::debug!("malformed line skipped");
        }
        IngestOutcome::SkippedIncomplete { missing } => {
            tracing::debug!(?missing, "incomplete event skipped");
        }
        IngestOutcome::SinkRejected { hash, reason } => {
            tracing::warn!(%hash, %reason, "sink rejected record, dropping event");
        }
        IngestOutcome::TransportFailed { hash, reason } => {
            tracing::warn!(%hash, %reason, "transport failure, pausing before next event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeproof_store::{MemoryStore, StoreError};

    fn pipeline(store: MemoryStore) -> IngestPipeline<MemoryStore> {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        IngestPipeline::new(keypair, store, Duration::from_millis(1))
    }

    fn line(ts: f64, prediction: &str) -> String {
        format!(
            r#"{{"deviceId":"dev1","timestamp":{ts},"prediction":"{prediction}","probability":0.9}}"#
        )
    }

    #[tokio::test]
    async fn test_skips_empty_and_malformed_and_incomplete() {
        let mut pipeline = pipeline(MemoryStore::new());

        assert!(matches!(
            pipeline.process_line("").await,
            IngestOutcome::SkippedEmpty
        ));
        assert!(matches!(
            pipeline.process_line("   ").await,
            IngestOutcome::SkippedEmpty
        ));
        assert!(matches!(
            pipeline.process_line("{not json").await,
            IngestOutcome::SkippedMalformed
        ));
        assert!(matches!(
            pipeline.process_line("[1,2]").await,
            IngestOutcome::SkippedMalformed
        ));

        let outcome = pipeline
            .process_line(r#"{"deviceId":"dev1","timestamp":1}"#)
            .await;
        match outcome {
            IngestOutcome::SkippedIncomplete { missing } => {
                assert_eq!(missing, vec!["prediction", "probability"]);
            }
            other => panic!("expected SkippedIncomplete, got {other:?}"),
        }

        // Nothing reached the store, and nothing advanced the dup filter.
        assert!(pipeline.store.is_empty());
        assert!(pipeline.last_hash().is_none());
    }

    #[tokio::test]
    async fn test_consecutive_duplicate_suppression() {
        // Input hashes [A, A, B, A]: positions 1, 3, 4 are forwarded.
        let mut pipeline = pipeline(MemoryStore::new());

        assert!(matches!(
            pipeline.process_line(&line(1.0, "fall")).await,
            IngestOutcome::Submitted { .. }
        ));
        assert!(matches!(
            pipeline.process_line(&line(1.0, "fall")).await,
            IngestOutcome::SuppressedDuplicate { .. }
        ));
        assert!(matches!(
            pipeline.process_line(&line(2.0, "walk")).await,
            IngestOutcome::Submitted { .. }
        ));
        // The earlier payload reappearing after B is NOT suppressed; the
        // content-addressed store reports the benign collision instead.
        assert!(matches!(
            pipeline.process_line(&line(1.0, "fall")).await,
            IngestOutcome::StoreDuplicate { .. }
        ));

        // Exactly three of the four events were forwarded to the sink.
        assert_eq!(pipeline.store.submit_calls(), 3);
        assert_eq!(pipeline.store.len(), 2);
    }

    #[tokio::test]
    async fn test_extra_fields_do_not_defeat_suppression() {
        let mut pipeline = pipeline(MemoryStore::new());

        pipeline.process_line(&line(1.0, "fall")).await;
        let with_extra =
            r#"{"timestamp":1,"deviceId":"dev1","prediction":"fall","probability":0.9,"rssi":-70}"#;
        assert!(matches!(
            pipeline.process_line(with_extra).await,
            IngestOutcome::SuppressedDuplicate { .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_drops_event_and_advances_filter() {
        let store = MemoryStore::new();
        store.fail_next_submit(StoreError::Transport("connection refused".into()));
        let mut pipeline = pipeline(store);

        let outcome = pipeline.process_line(&line(1.0, "fall")).await;
        assert!(matches!(outcome, IngestOutcome::TransportFailed { .. }));
        assert!(outcome.needs_pause());

        // The event was dropped, not retried; an immediate re-read of the
        // same line is suppressed because last_hash already advanced.
        assert!(matches!(
            pipeline.process_line(&line(1.0, "fall")).await,
            IngestOutcome::SuppressedDuplicate { .. }
        ));
        assert!(pipeline.store.is_empty());
    }

    #[tokio::test]
    async fn test_sink_rejection_continues_without_pause() {
        let store = MemoryStore::new();
        store.fail_next_submit(StoreError::Sink("schema mismatch".into()));
        let mut pipeline = pipeline(store);

        let outcome = pipeline.process_line(&line(1.0, "fall")).await;
        assert!(matches!(outcome, IngestOutcome::SinkRejected { .. }));
        assert!(!outcome.needs_pause());

        // The next distinct event goes through.
        assert!(matches!(
            pipeline.process_line(&line(2.0, "fall")).await,
            IngestOutcome::Submitted { .. }
        ));
    }

    #[tokio::test]
    async fn test_run_drains_source_and_survives_bad_lines() {
        use crate::source::VecSource;

        let store = MemoryStore::new();
        let mut source = VecSource::new([
            line(1.0, "fall"),
            "".into(),
            "garbage".into(),
            line(1.0, "fall"),
            line(2.0, "walk"),
        ]);

        let mut pipeline = pipeline(store);
        pipeline.run(&mut source).await.unwrap();

        assert_eq!(pipeline.store.len(), 2);
    }
}
