//! Golden byte vectors for cross-implementation verification.
//!
//! Every implementation of the record protocol must map the input event to
//! exactly these canonical bytes and this SHA-256 digest. The digests were
//! computed independently of this codebase.

/// One golden vector: input line, canonical bytes, digest.
#[derive(Debug)]
pub struct GoldenVector {
    pub name: &'static str,
    pub event_json: &'static str,
    pub canonical: &'static str,
    pub payload_hash_hex: &'static str,
}

/// All golden vectors.
pub fn all() -> Vec<GoldenVector> {
    vec![
        // The reference scenario: extra field dropped, keys re-sorted,
        // fractional timestamp.
        GoldenVector {
            name: "reference_event",
            event_json: r#"{"deviceId":"dev1","timestamp":1000.5,"prediction":"fall","probability":0.87,"extra":"x"}"#,
            canonical: r#"{"deviceId":"dev1","prediction":"fall","probability":0.87,"timestamp":1000.5}"#,
            payload_hash_hex: "fe9209c26fea90eeea36e4ee8aa248a8c56e9a95cb1e42cb7a6af1857a5ad8c1",
        },
        // A missing field is an explicit null, never omitted.
        GoldenVector {
            name: "missing_probability",
            event_json: r#"{"deviceId":"dev1","timestamp":1000,"prediction":"idle"}"#,
            canonical: r#"{"deviceId":"dev1","prediction":"idle","probability":null,"timestamp":1000}"#,
            payload_hash_hex: "b4a25545affdfedda915966a33d1014f115e7e94c3496e9e5eb1858bbce1d6eb",
        },
        // Integer timestamps stay integers.
        GoldenVector {
            name: "integer_timestamp",
            event_json: r#"{"deviceId":"sensor-7","timestamp":1700000000,"prediction":"walk","probability":0.5}"#,
            canonical: r#"{"deviceId":"sensor-7","prediction":"walk","probability":0.5,"timestamp":1700000000}"#,
            payload_hash_hex: "f5f392f4acef595152f8b55545e3a7362e990bb697fd2e951435864082ebe5ad",
        },
        // The degenerate all-null payload still has a fixed encoding.
        GoldenVector {
            name: "all_fields_absent",
            event_json: r#"{"unrelated":true}"#,
            canonical: r#"{"deviceId":null,"prediction":null,"probability":null,"timestamp":null}"#,
            payload_hash_hex: "9e225a885b45c49ff39de64b606b36f32d2371a0eef9c73b258508d7c51bde30",
        },
    ]
}
