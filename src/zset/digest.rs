//! Member digests
//!
//! Members are looked up by a 32-bit CRC32 (IEEE) digest of their bytes.
//! The digest is a lookup key only: distinct members may collide.
//!
//! Members with equal scores are ordered by digest, so data migrated from an
//! engine that digests with FNV-32 will see a different tie-break order.

use crc32fast::Hasher;

/// Digest type used as the lookup key for a member.
pub type Digest = u32;

/// Computes the digest of a member value.
///
/// Pure and deterministic: equal bytes always produce equal digests.
pub fn member_digest(member: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(member);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(member_digest(b"player:42"), member_digest(b"player:42"));
    }

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(member_digest(b"123456789"), 0xCBF4_3926);
        assert_eq!(member_digest(b""), 0);
    }

    #[test]
    fn test_digest_distinguishes_members() {
        assert_ne!(member_digest(b"b"), member_digest(b"c"));
    }
}
