//! One-way digest of raw refresh tokens.

use sha2::{Digest, Sha256};

/// Digest a raw token for storage and lookup.
///
/// Deterministic across processes, no per-instance salt. Not a password
/// hash: the raw token already carries the entropy from the signing step.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test";

        let hashes: Vec<String> = (0..10).map(|_| hash_token(token)).collect();

        for hash in &hashes[1..] {
            assert_eq!(&hashes[0], hash);
        }
    }

    #[test]
    fn test_distinct_inputs_distinct_digests() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }

    #[test]
    fn test_digest_shape() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test";
        let hash = hash_token(token);

        // SHA-256 in lowercase hex
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!hash.contains("eyJ"));
    }
}
