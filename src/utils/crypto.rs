//! Cryptographic utilities

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::constants::{CONFIRMATION_CODE_MAX, CONFIRMATION_CODE_MIN};

/// Generate a random six-digit confirmation code
pub fn generate_confirmation_code() -> String {
    rand::rng()
        .random_range(CONFIRMATION_CODE_MIN..=CONFIRMATION_CODE_MAX)
        .to_string()
}

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Verify a hash matches the input
pub fn verify_hash(input: &str, hash: &str) -> bool {
    let computed = hash_string(input);
    // Compare without short-circuiting on the first differing byte
    computed.len() == hash.len()
        && computed
            .bytes()
            .zip(hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_confirmation_code() {
        for _ in 0..100 {
            let code = generate_confirmation_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((CONFIRMATION_CODE_MIN..=CONFIRMATION_CODE_MAX).contains(&value));
        }
    }

    #[test]
    fn test_hash_string() {
        let hash1 = hash_string("test");
        let hash2 = hash_string("test");
        let hash3 = hash_string("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_verify_hash() {
        let input = "482913";
        let hash = hash_string(input);

        assert!(verify_hash(input, &hash));
        assert!(!verify_hash("482914", &hash));
        assert!(!verify_hash(input, "short"));
    }
}
