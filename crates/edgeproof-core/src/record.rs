//! Signed records: the tamper-evident unit stored in the sink.
//!
//! A record is the canonical payload plus three proof fields. Once sealed
//! it is immutable; any later edit is detectable by re-running the hash and
//! signature checks against the embedded public key.

use serde_json::{Map, Value};

use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash};
use crate::error::CoreError;
use crate::event::CanonicalPayload;

/// A sealed, signed record.
///
/// Invariants for an authentic record:
/// - `payload_hash == SHA256(canonical_bytes(payload))`
/// - `signature` verifies over the canonical bytes with `signer_pubkey`
///
/// The public key travels with the record (trust-on-first-use): a verifier
/// can check internal consistency without out-of-band key distribution, but
/// not that the signer is the claimed device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRecord {
    pub payload: CanonicalPayload,
    pub payload_hash: Sha256Hash,
    pub signature: Ed25519Signature,
    pub signer_pubkey: Ed25519PublicKey,
}

impl SignedRecord {
    /// Hash and sign a canonical payload, embedding the signer's public key.
    pub fn seal(payload: CanonicalPayload, keypair: &Keypair) -> Self {
        let bytes = payload.to_bytes();
        let payload_hash = Sha256Hash::hash(&bytes);
        let signature = keypair.sign(&bytes);
        Self {
            payload,
            payload_hash,
            signature,
            signer_pubkey: keypair.public_key(),
        }
    }

    /// The record as a sink input object: the four payload fields plus
    /// `payload_hash` (hex), `signature` and `signer_pubkey` (base64).
    pub fn to_input(&self) -> Value {
        let mut map = match self.payload.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert("payload_hash".into(), Value::String(self.payload_hash.to_hex()));
        map.insert("signature".into(), Value::String(self.signature.to_base64()));
        map.insert(
            "signer_pubkey".into(),
            Value::String(self.signer_pubkey.to_base64()),
        );
        Value::Object(map)
    }

    /// Parse a record from a sink query row.
    pub fn from_row(row: &Value) -> Result<Self, CoreError> {
        let obj = row
            .as_object()
            .ok_or_else(|| CoreError::MalformedRecord("expected an object row".into()))?;

        let field = |name: &str| obj.get(name).cloned().unwrap_or(Value::Null);
        let payload = CanonicalPayload {
            device_id: field("deviceId"),
            timestamp: field("timestamp"),
            prediction: field("prediction"),
            probability: field("probability"),
        };

        let proof = |name: &str| -> Result<&str, CoreError> {
            obj.get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| CoreError::MalformedRecord(format!("missing {name}")))
        };

        let payload_hash = Sha256Hash::from_hex(proof("payload_hash")?)
            .map_err(|e| CoreError::MalformedRecord(format!("invalid payload_hash: {e}")))?;
        let signature = Ed25519Signature::from_base64(proof("signature")?)
            .map_err(|e| CoreError::MalformedRecord(format!("invalid signature: {e}")))?;
        let signer_pubkey = Ed25519PublicKey::from_base64(proof("signer_pubkey")?)
            .map_err(|e| CoreError::MalformedRecord(format!("invalid signer_pubkey: {e}")))?;

        Ok(Self {
            payload,
            payload_hash,
            signature,
            signer_pubkey,
        })
    }
}
