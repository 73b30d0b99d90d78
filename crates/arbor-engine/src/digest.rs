//! Deterministic digests of published planes.
//!
//! Uses FNV-1a for fast equality checks between runs. Not cryptographically
//! secure.

use arbor_arena::Snapshot;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed bytes into an FNV-1a hash state.
#[inline]
fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash a state plane and meta plane.
///
/// The plane lengths are folded in first so that moving bytes between the
/// two planes changes the digest.
pub fn planes_digest(state: &[u8], meta: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a(hash, &(state.len() as u64).to_le_bytes());
    hash = fnv1a(hash, &(meta.len() as u64).to_le_bytes());
    hash = fnv1a(hash, state);
    fnv1a(hash, meta)
}

/// Hash both planes of a snapshot.
pub fn snapshot_digest(snapshot: &Snapshot<'_>) -> u64 {
    planes_digest(snapshot.state_bytes(), snapshot.meta_bytes())
}
