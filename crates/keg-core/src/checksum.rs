//! SHA-256 verification of downloaded artifacts.
//!
//! An empty stored checksum means the release pipeline has not filled it in
//! yet: the artifact installs as unverified. A non-empty mismatch is fatal.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Stored checksum does not match the downloaded content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checksum mismatch: expected {expected}, got {actual}")]
pub struct ChecksumError {
    pub expected: String,
    pub actual: String,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Digest matched the stored checksum.
    Verified { digest: String },
    /// No stored checksum; digest recorded but not compared.
    Unverified { digest: String },
}

impl Verification {
    pub fn digest(&self) -> &str {
        match self {
            Verification::Verified { digest } | Verification::Unverified { digest } => digest,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a computed digest with a stored checksum (trimmed, case-insensitive).
pub fn check_digest(digest: &str, expected: &str) -> Result<Verification, ChecksumError> {
    let expected = expected.trim();
    if expected.is_empty() {
        return Ok(Verification::Unverified {
            digest: digest.to_string(),
        });
    }
    if digest.eq_ignore_ascii_case(expected) {
        Ok(Verification::Verified {
            digest: digest.to_string(),
        })
    } else {
        Err(ChecksumError {
            expected: expected.to_ascii_lowercase(),
            actual: digest.to_string(),
        })
    }
}
