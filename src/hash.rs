//! Key hashing: a Horner-rule polynomial over the key bytes.

use crate::key::Key;

/// Odd multiplier of the polynomial hash.
pub const HASH_MULTIPLIER: u64 = 65599;

/// Digest of `bytes`; pure and independent of any table state.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |h, &b| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u64::from(b))
    })
}

/// Digest of a key's byte view.
#[inline]
pub fn hash_key<Q: ?Sized + Key>(key: &Q) -> u64 {
    hash_bytes(key.key_bytes())
}

/// Bucket of `key` in an array of `bucket_count` buckets.
///
/// Always reduce against the current bucket count; a digest reduced against
/// an older count names the wrong bucket.
///
/// # Panics
///
/// Panics if `bucket_count` is zero, in every build profile.
#[inline]
pub fn bucket_index<Q: ?Sized + Key>(key: &Q, bucket_count: usize) -> usize {
    assert!(bucket_count > 0, "bucket_index: bucket count must be non-zero");
    (hash_key(key) % bucket_count as u64) as usize
}
