//! Deterministic fixtures for tests.

use serde_json::{json, Value};

use edgeproof_core::{CanonicalPayload, Keypair, RawEvent, SignedRecord};

/// A deterministic keypair derived from a one-byte tag.
pub fn keypair(tag: u8) -> Keypair {
    Keypair::from_seed(&[tag; 32])
}

/// A well-formed sensor line.
pub fn event_line(device: &str, ts: f64, prediction: &str, probability: f64) -> String {
    json!({
        "deviceId": device,
        "timestamp": ts,
        "prediction": prediction,
        "probability": probability,
    })
    .to_string()
}

/// A parsed event from [`event_line`].
pub fn raw_event(device: &str, ts: f64, prediction: &str, probability: f64) -> RawEvent {
    RawEvent::parse(&event_line(device, ts, prediction, probability))
        .expect("fixture line is valid JSON")
}

/// A canonical payload from [`event_line`].
pub fn payload(device: &str, ts: f64, prediction: &str, probability: f64) -> CanonicalPayload {
    CanonicalPayload::from_event(&raw_event(device, ts, prediction, probability))
}

/// A sealed record signed by the tagged keypair.
pub fn sealed(
    tag: u8,
    device: &str,
    ts: f64,
    prediction: &str,
    probability: f64,
) -> SignedRecord {
    SignedRecord::seal(payload(device, ts, prediction, probability), &keypair(tag))
}

/// The record with its prediction edited and no proofs re-derived.
pub fn tamper_prediction(record: &SignedRecord, prediction: &str) -> SignedRecord {
    let mut tampered = record.clone();
    tampered.payload.prediction = Value::String(prediction.into());
    tampered
}

/// The record with one bit of its stored hash flipped.
pub fn tamper_hash(record: &SignedRecord) -> SignedRecord {
    let mut tampered = record.clone();
    let mut bytes = *tampered.payload_hash.as_bytes();
    bytes[0] ^= 0x01;
    tampered.payload_hash = bytes.into();
    tampered
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeproof_core::verify_record;

    #[test]
    fn test_sealed_fixture_verifies() {
        assert!(verify_record(&sealed(0x42, "dev1", 1000.5, "fall", 0.87)).is_ok());
    }

    #[test]
    fn test_tamper_helpers_break_verification() {
        let record = sealed(0x42, "dev1", 1000.5, "fall", 0.87);
        assert!(verify_record(&tamper_prediction(&record, "walk")).is_err());
        assert!(verify_record(&tamper_hash(&record)).is_err());
    }
}
