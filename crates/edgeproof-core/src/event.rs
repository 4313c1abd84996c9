//! Sensor events and their canonical form.
//!
//! A raw event is whatever the sensor emitted on one line. The canonical
//! payload is the fixed four-field subset that gets hashed and signed;
//! everything else is dropped before any cryptography happens.

use serde_json::{Map, Value};

use crate::canonical::to_canonical_bytes;
use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// The canonical field set, in canonical order. Fields absent from a raw
/// event are carried as explicit nulls, never omitted. Changing this set
/// or its order is a breaking protocol change.
pub const CANONICAL_FIELDS: [&str; 4] = ["deviceId", "timestamp", "prediction", "probability"];

/// One raw event as received from the sensor: an unordered field map.
/// Extra fields are allowed and ignored downstream.
#[derive(Debug, Clone)]
pub struct RawEvent {
    fields: Map<String, Value>,
}

impl RawEvent {
    /// Parse one line of sensor output.
    pub fn parse(line: &str) -> Result<Self, CoreError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| CoreError::MalformedEvent(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CoreError::MalformedEvent(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Build from an existing field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The canonical fields this event is missing.
    ///
    /// Presence is the only check: a field of the wrong type or range still
    /// counts as present and will be signed as-is.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        CANONICAL_FIELDS
            .iter()
            .filter(|name| !self.fields.contains_key(**name))
            .copied()
            .collect()
    }
}

/// The fixed four-field payload that gets hashed and signed.
///
/// Equality is byte-identity of the canonical serialization: two payloads
/// are the same payload exactly when they serialize to the same bytes.
#[derive(Debug, Clone)]
pub struct CanonicalPayload {
    pub device_id: Value,
    pub timestamp: Value,
    pub prediction: Value,
    pub probability: Value,
}

impl CanonicalPayload {
    /// Canonicalize a raw event: select exactly the canonical fields, with
    /// explicit nulls for absent ones. Pure, no validation.
    pub fn from_event(event: &RawEvent) -> Self {
        let pick = |name: &str| event.get(name).cloned().unwrap_or(Value::Null);
        Self {
            device_id: pick("deviceId"),
            timestamp: pick("timestamp"),
            prediction: pick("prediction"),
            probability: pick("probability"),
        }
    }

    /// The payload as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(4);
        map.insert("deviceId".into(), self.device_id.clone());
        map.insert("timestamp".into(), self.timestamp.clone());
        map.insert("prediction".into(), self.prediction.clone());
        map.insert("probability".into(), self.probability.clone());
        Value::Object(map)
    }

    /// Serialize to canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&self.to_value())
    }

    /// SHA-256 of the canonical bytes.
    pub fn hash(&self) -> Sha256Hash {
        Sha256Hash::hash(&self.to_bytes())
    }

    /// Timestamp as f64, if it is a JSON number.
    pub fn timestamp_f64(&self) -> Option<f64> {
        self.timestamp.as_f64()
    }

    /// Device identifier, if it is a string.
    pub fn device_id_str(&self) -> Option<&str> {
        self.device_id.as_str()
    }

    /// Prediction label, if it is a string.
    pub fn prediction_str(&self) -> Option<&str> {
        self.prediction.as_str()
    }

    /// Probability as f64, if it is a JSON number.
    pub fn probability_f64(&self) -> Option<f64> {
        self.probability.as_f64()
    }
}

impl PartialEq for CanonicalPayload {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for CanonicalPayload {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(RawEvent::parse("[1,2,3]").is_err());
        assert!(RawEvent::parse("42").is_err());
        assert!(RawEvent::parse("{\"deviceId\": ").is_err());
        assert!(RawEvent::parse("").is_err());
    }

    #[test]
    fn test_missing_fields() {
        let event = RawEvent::parse(r#"{"deviceId":"dev1","timestamp":1}"#).unwrap();
        assert_eq!(event.missing_fields(), vec!["prediction", "probability"]);

        let full = RawEvent::parse(
            r#"{"deviceId":"dev1","timestamp":1,"prediction":"fall","probability":0.5}"#,
        )
        .unwrap();
        assert!(full.missing_fields().is_empty());
    }

    #[test]
    fn test_wrong_type_still_counts_as_present() {
        // Presence-only validation: a string probability is signed as-is.
        let event = RawEvent::parse(
            r#"{"deviceId":"dev1","timestamp":1,"prediction":"fall","probability":"high"}"#,
        )
        .unwrap();
        assert!(event.missing_fields().is_empty());
    }

    #[test]
    fn test_canonicalize_concrete_scenario() {
        let event = RawEvent::parse(
            r#"{"deviceId":"dev1","timestamp":1000.5,"prediction":"fall","probability":0.87,"extra":"x"}"#,
        )
        .unwrap();
        let payload = CanonicalPayload::from_event(&event);

        assert_eq!(
            payload.to_bytes(),
            br#"{"deviceId":"dev1","prediction":"fall","probability":0.87,"timestamp":1000.5}"#
        );
        assert_eq!(
            payload.hash().to_hex(),
            "fe9209c26fea90eeea36e4ee8aa248a8c56e9a95cb1e42cb7a6af1857a5ad8c1"
        );
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let event = RawEvent::parse(r#"{"deviceId":"dev1","timestamp":1000,"prediction":"idle"}"#)
            .unwrap();
        let payload = CanonicalPayload::from_event(&event);

        assert_eq!(
            payload.to_bytes(),
            br#"{"deviceId":"dev1","prediction":"idle","probability":null,"timestamp":1000}"#
        );
    }

    #[test]
    fn test_equality_is_byte_identity() {
        let a = CanonicalPayload::from_event(
            &RawEvent::parse(r#"{"probability":0.5,"deviceId":"d","timestamp":1,"prediction":"p"}"#)
                .unwrap(),
        );
        let b = CanonicalPayload::from_event(
            &RawEvent::parse(r#"{"deviceId":"d","timestamp":1,"prediction":"p","probability":0.5,"extra":9}"#)
                .unwrap(),
        );
        assert_eq!(a, b);

        let c = CanonicalPayload::from_event(
            &RawEvent::parse(r#"{"deviceId":"d","timestamp":2,"prediction":"p","probability":0.5}"#)
                .unwrap(),
        );
        assert_ne!(a, c);
    }

    proptest! {
        // Extra fields and source key order never change the canonical bytes.
        #[test]
        fn prop_canonicalization_deterministic(
            device in "[a-zA-Z0-9_-]{1,16}",
            ts in 0u64..4_000_000_000,
            prediction in "[a-z]{1,12}",
            probability in 0.0f64..=1.0,
            extra_key in "[a-z]{1,8}",
            extra_val in any::<i64>(),
        ) {
            let plain = format!(
                r#"{{"deviceId":"{device}","timestamp":{ts},"prediction":"{prediction}","probability":{probability}}}"#
            );
            let shuffled = format!(
                r#"{{"probability":{probability},"prediction":"{prediction}","{extra_key}x":{extra_val},"deviceId":"{device}","timestamp":{ts}}}"#
            );

            let a = CanonicalPayload::from_event(&RawEvent::parse(&plain).unwrap());
            let b = CanonicalPayload::from_event(&RawEvent::parse(&shuffled).unwrap());

            prop_assert_eq!(a.to_bytes(), b.to_bytes());
            prop_assert_eq!(a.hash(), b.hash());
        }
    }
}
