//! Record verification: independent re-derivation of the proofs.
//!
//! Verification trusts nothing but the record itself: the payload is
//! re-canonicalized, re-hashed, and the signature re-checked against the
//! embedded public key. This proves internal consistency only — the
//! trust-on-first-use model does not prove the signer is the claimed
//! device.

use crate::crypto::Sha256Hash;
use crate::error::VerificationError;
use crate::record::SignedRecord;

/// Verify a stored record.
///
/// Recomputes the canonical bytes and hash, compares against the stored
/// `payload_hash`, then verifies the embedded signature over the recomputed
/// bytes. Returns the first failing check.
pub fn verify_record(record: &SignedRecord) -> Result<(), VerificationError> {
    let bytes = record.payload.to_bytes();

    let computed = Sha256Hash::hash(&bytes);
    if computed != record.payload_hash {
        return Err(VerificationError::HashMismatch {
            expected: record.payload_hash.to_hex(),
            actual: computed.to_hex(),
        });
    }

    record
        .signer_pubkey
        .verify(&bytes, &record.signature)
        .map_err(VerificationError::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519Signature, Keypair};
    use crate::event::{CanonicalPayload, RawEvent};
    use serde_json::Value;

    fn sealed(seed: u8) -> SignedRecord {
        let keypair = Keypair::from_seed(&[seed; 32]);
        let payload = CanonicalPayload::from_event(
            &RawEvent::parse(
                r#"{"deviceId":"dev1","timestamp":1000.5,"prediction":"fall","probability":0.87}"#,
            )
            .unwrap(),
        );
        SignedRecord::seal(payload, &keypair)
    }

    #[test]
    fn test_authentic_record_verifies() {
        assert!(verify_record(&sealed(0x42)).is_ok());
    }

    #[test]
    fn test_tampered_payload_field_fails_hash_check() {
        for tamper in [
            ("deviceId", Value::String("dev2".into())),
            ("timestamp", Value::from(1000.6)),
            ("prediction", Value::String("walk".into())),
            ("probability", Value::from(0.88)),
        ] {
            let mut record = sealed(0x42);
            match tamper.0 {
                "deviceId" => record.payload.device_id = tamper.1,
                "timestamp" => record.payload.timestamp = tamper.1,
                "prediction" => record.payload.prediction = tamper.1,
                _ => record.payload.probability = tamper.1,
            }
            let result = verify_record(&record);
            assert!(
                matches!(result, Err(VerificationError::HashMismatch { .. })),
                "tampering {} must fail the hash check",
                tamper.0
            );
        }
    }

    #[test]
    fn test_tampered_hash_fails_even_with_valid_signature() {
        let mut record = sealed(0x42);
        let mut bytes = *record.payload_hash.as_bytes();
        bytes[0] ^= 0x01;
        record.payload_hash = bytes.into();

        assert!(matches!(
            verify_record(&record),
            Err(VerificationError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_rehashed_tamper_fails_signature_check() {
        // An attacker who edits a field and recomputes the hash still cannot
        // forge the signature.
        let mut record = sealed(0x42);
        record.payload.prediction = Value::String("walk".into());
        record.payload_hash = record.payload.hash();

        assert!(matches!(
            verify_record(&record),
            Err(VerificationError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_mutated_signature_fails() {
        let mut record = sealed(0x42);
        let mut sig = *record.signature.as_bytes();
        sig[10] ^= 0x80;
        record.signature = Ed25519Signature::from_bytes(sig);

        assert!(matches!(
            verify_record(&record),
            Err(VerificationError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_substituted_pubkey_fails() {
        let mut record = sealed(0x42);
        record.signer_pubkey = Keypair::from_seed(&[0x43; 32]).public_key();

        assert!(matches!(
            verify_record(&record),
            Err(VerificationError::SignatureInvalid)
        ));
    }
}
