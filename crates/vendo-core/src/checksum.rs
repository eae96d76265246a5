//! SHA-1 checksums for distribution archives
//!
//! The npm registry publishes a hex SHA-1 digest (the `shasum`) for
//! every tarball, and vendor files pin the same value. This is an
//! integrity check, not a secret comparison, so no constant-time
//! handling is required.

use sha1::{Digest, Sha1};

/// Compute the lowercase hex SHA-1 digest of data
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Check data against an expected hex digest
///
/// Hex digits are compared case-sensitively; registry shasums are
/// always lowercase.
pub fn verify(data: &[u8], expected: &str) -> bool {
    sha1_hex(data) == expected
}
