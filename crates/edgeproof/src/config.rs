//! Process configuration, read once at startup.
//!
//! Every setting comes from the environment with a documented default;
//! there is no runtime reconfiguration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings for the ingest and verify loops.
#[derive(Debug, Clone)]
pub struct Config {
    /// Device node the raw-event lines are read from.
    /// `EDGEPROOF_DEVICE`, default `/dev/ttyACM0`.
    pub device_path: PathBuf,

    /// GraphQL endpoint of the record store.
    /// `EDGEPROOF_GQL_URL`, default `http://localhost:9181/api/v0/graphql`.
    pub graphql_url: String,

    /// Path of the raw Ed25519 seed file.
    /// `EDGEPROOF_KEY_PATH`, default `edge_signer_ed25519.key`.
    pub key_path: PathBuf,

    /// Request timeout when submitting records.
    /// `EDGEPROOF_SUBMIT_TIMEOUT_SECS`, default 5.
    pub submit_timeout: Duration,

    /// Request timeout when fetching records.
    /// `EDGEPROOF_FETCH_TIMEOUT_SECS`, default 10.
    pub fetch_timeout: Duration,

    /// Flat pause after a transport failure in the ingest loop.
    /// `EDGEPROOF_ERROR_PAUSE_SECS`, default 1.
    pub error_pause: Duration,

    /// Interval between verifier polls.
    /// `EDGEPROOF_POLL_INTERVAL_SECS`, default 2.
    pub poll_interval: Duration,

    /// Row limit per verifier poll. The verifier is a sampling auditor,
    /// not a guaranteed-complete scanner.
    /// `EDGEPROOF_POLL_LIMIT`, default 200.
    pub poll_limit: usize,
}

impl Config {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            device_path: PathBuf::from(var_or("EDGEPROOF_DEVICE", "/dev/ttyACM0")),
            graphql_url: var_or("EDGEPROOF_GQL_URL", "http://localhost:9181/api/v0/graphql"),
            key_path: PathBuf::from(var_or("EDGEPROOF_KEY_PATH", "edge_signer_ed25519.key")),
            submit_timeout: secs("EDGEPROOF_SUBMIT_TIMEOUT_SECS", 5)?,
            fetch_timeout: secs("EDGEPROOF_FETCH_TIMEOUT_SECS", 10)?,
            error_pause: secs("EDGEPROOF_ERROR_PAUSE_SECS", 1)?,
            poll_interval: secs("EDGEPROOF_POLL_INTERVAL_SECS", 2)?,
            poll_limit: parse("EDGEPROOF_POLL_LIMIT", 200)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("/dev/ttyACM0"),
            graphql_url: "http://localhost:9181/api/v0/graphql".into(),
            key_path: PathBuf::from("edge_signer_ed25519.key"),
            submit_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(10),
            error_pause: Duration::from_secs(1),
            poll_interval: Duration::from_secs(2),
            poll_limit: 200,
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn secs(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_secs(parse(name, default)?))
}

fn parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
