//! Hashing System - SHA-256 Based, Process Independent
//!
//! Signature hashes must not depend on a per-process hasher seed, so
//! names and kind tags are hashed through SHA-256 and truncated.

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// First 8 bytes of the SHA-256 digest, little endian.
pub fn stable_hash64(data: &[u8]) -> u64 {
    let digest = Sha256::digest(data);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Hash of a property name.
pub fn name_hash(name: &str) -> u64 {
    stable_hash64(name.as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash_deterministic() {
        assert_eq!(name_hash("id"), name_hash("id"));
        assert_ne!(name_hash("id"), name_hash("name"));
    }

    #[test]
    fn test_stable_hash64_known_value() {
        // sha256("") = e3b0c44298fc1c14...
        assert_eq!(stable_hash64(b""), u64::from_le_bytes([0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14]));
    }

    #[test]
    fn test_sha256_hex_length() {
        assert_eq!(sha256_hex(b"test data").len(), 64);
    }
}
