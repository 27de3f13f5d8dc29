// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Query fingerprints.
//!
//! The fingerprint is the SHA-256 digest of the exact query bytes, hex
//! encoded. No normalization is applied: any textual difference, whitespace
//! included, yields a different fingerprint.

use sha2::{Digest, Sha256};

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 64;

/// Hex-encoded SHA-256 of `query`.
pub fn fingerprint(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}
