//! GraphQL implementation of the record store.
//!
//! Talks to a content-addressed document store exposing a GraphQL API.
//! Request building and response parsing are pure functions so the wire
//! contract is testable without a live endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use edgeproof_core::SignedRecord;

use crate::error::{Result, StoreError};
use crate::traits::{RecordStore, SubmitOutcome};

/// Mutation submitting a batch of signed records.
const SUBMIT_MUTATION: &str = "\
mutation($in: [SensorEventMutationInputArg!]!) {
  create_SensorEvent(input: $in) { _docID }
}";

/// Query fetching records ordered by timestamp ascending.
const RECENT_QUERY: &str = "\
query($limit: Int!) {
  SensorEvent(order: {timestamp: ASC}, limit: $limit) {
    deviceId timestamp prediction probability payload_hash signature signer_pubkey
  }
}";

/// Connect timeout for the HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How much response body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// GraphQL-backed record store.
pub struct GraphqlStore {
    url: String,
    client: Client,
}

impl GraphqlStore {
    /// Build a store client for the given endpoint with a bounded
    /// per-request timeout.
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        tracing::debug!(%status, "sink response");

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: truncate(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for GraphqlStore {
    async fn submit(&self, record: &SignedRecord) -> Result<SubmitOutcome> {
        let body = submit_body(record);
        let response = self.post(&body).await?;
        parse_submit_response(&response)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SignedRecord>> {
        let body = recent_body(limit);
        let response = self.post(&body).await?;
        parse_recent_response(&response)
    }
}

/// Build the submission request document.
fn submit_body(record: &SignedRecord) -> Value {
    json!({
        "query": SUBMIT_MUTATION,
        "variables": { "in": [record.to_input()] },
    })
}

/// Build the retrieval request document.
fn recent_body(limit: usize) -> Value {
    json!({
        "query": RECENT_QUERY,
        "variables": { "limit": limit },
    })
}

/// Interpret a submission response.
///
/// The store is content-addressed, so an "already exists" error means the
/// identical document is stored and the submission succeeded in effect.
fn parse_submit_response(response: &Value) -> Result<SubmitOutcome> {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        let joined = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
            })
            .collect::<Vec<_>>()
            .join("; ");

        if joined.contains("already exists") {
            return Ok(SubmitOutcome::AlreadyExists);
        }
        return Err(StoreError::Sink(truncate(&joined)));
    }

    let doc_id = response
        .pointer("/data/create_SensorEvent/0/_docID")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode("missing _docID in mutation response".into()))?;

    Ok(SubmitOutcome::Stored {
        doc_id: doc_id.to_string(),
    })
}

/// Interpret a retrieval response into signed records.
fn parse_recent_response(response: &Value) -> Result<Vec<SignedRecord>> {
    if let Some(rows) = response.pointer("/data/SensorEvent").and_then(Value::as_array) {
        return rows.iter().map(|row| Ok(SignedRecord::from_row(row)?)).collect();
    }

    if let Some(errors) = response.get("errors") {
        return Err(StoreError::Sink(truncate(&errors.to_string())));
    }

    // An empty store answers with no rows at all.
    Ok(Vec::new())
}

fn truncate(s: &str) -> String {
    if s.len() <= ERROR_BODY_LIMIT {
        s.to_string()
    } else {
        let mut end = ERROR_BODY_LIMIT;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}
