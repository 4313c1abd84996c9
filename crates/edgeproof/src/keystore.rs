//! Signing key persistence.
//!
//! The device identity is a raw 32-byte Ed25519 seed at a fixed path,
//! loaded at startup or generated once and persisted. A key file of the
//! wrong shape is fatal at startup; a new identity is never minted
//! silently.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use edgeproof_core::Keypair;

/// Length of the persisted seed.
pub const SEED_LEN: usize = 32;

/// Errors loading or creating the signing key.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key file {} is malformed: expected {} bytes, found {}", .path.display(), SEED_LEN, .len)]
    Malformed { path: PathBuf, len: usize },
}

/// Load the keypair from `path`, or generate and persist a new one if the
/// file does not exist.
pub fn load_or_create(path: &Path) -> Result<Keypair, KeystoreError> {
    if path.exists() {
        let bytes = fs::read(path)?;
        let seed: [u8; SEED_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeystoreError::Malformed {
                    path: path.to_path_buf(),
                    len: bytes.len(),
                })?;
        Ok(Keypair::from_seed(&seed))
    } else {
        let keypair = Keypair::generate();
        write_seed(path, &keypair.seed())?;
        tracing::info!(path = %path.display(), "generated new signing key");
        Ok(keypair)
    }
}

/// Persist the seed, owner-readable only where the platform supports it.
fn write_seed(path: &Path, seed: &[u8; SEED_LEN]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(seed)?;
    Ok(())
}
