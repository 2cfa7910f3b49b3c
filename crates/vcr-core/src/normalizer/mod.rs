//! Canonical normalizers — headers and URIs
//!
//! Both normalizers are pure functions invoked by the constructors of the
//! entities that hold headers or a URI. They run once, before the value is
//! handed out, and never fail.
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Total**: unparseable URIs and absent headers have a defined result

pub mod headers;
pub mod uri;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Result;

pub use headers::{normalize_headers, Headers, RawHeaderValue, RawHeaders};
pub use uri::{default_port, normalize_uri, DEFAULT_PORTS};

// ── SHA-256 Hash Computation ──────────────────────────────

/// Compute the SHA-256 digest of a canonical value
///
/// The digest covers the compact JSON serialization. Headers serialize in
/// sorted name order, so equal canonical values always hash equally.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let canonical = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = canonical_hash(&normalize_headers(None)).unwrap();
        assert_eq!(hash.len(), 64, "Hash should be 64 hex chars, got: {}", hash);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_raw_header_order() {
        let a: RawHeaders = vec![("B", "2"), ("a", "1")].into_iter().collect();
        let b: RawHeaders = vec![("A", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(
            canonical_hash(&normalize_headers(Some(a))).unwrap(),
            canonical_hash(&normalize_headers(Some(b))).unwrap()
        );
    }

    #[test]
    fn test_hash_determinism_100_iterations() {
        let raw: RawHeaders = vec![("Accept", "*/*")].into_iter().collect();
        let headers = normalize_headers(Some(raw));
        let first = canonical_hash(&headers).unwrap();
        for i in 0..100 {
            assert_eq!(first, canonical_hash(&headers).unwrap(), "Non-determinism at iteration {}", i);
        }
    }
}
