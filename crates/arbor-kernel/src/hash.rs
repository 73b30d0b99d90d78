//! Position-keyed deterministic randomness.
//!
//! There is no RNG state anywhere in the kernel. Every random decision is a
//! hash of `(position, role, epoch, salt)`, so any cell evaluating a given
//! source reaches the same verdict, in any order, on any thread.

use arbor_core::Role;
use arbor_space::Pos;

use crate::params::CHANCE_ONE;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Independent draw streams. Each decision uses its own salt so that, for
/// example, the side-branch angle is uncorrelated with whether it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Salt {
    /// Whether a tip steers.
    TurnChance = 0x11,
    /// Steering direction.
    TurnSign = 0x12,
    /// Steering rotation size.
    TurnMagnitude = 0x13,
    /// Whether a tip side-branches.
    BranchChance = 0x21,
    /// Side-branch direction.
    BranchSign = 0x22,
    /// Side-branch angle.
    BranchAngle = 0x23,
}

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// 64-bit avalanche finaliser; FNV alone leaves low bits poorly mixed for
/// short, structured keys.
#[inline]
fn finalize(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^= h >> 33;
    h
}

/// Hash a draw key to 32 bits.
pub fn cell_hash(pos: Pos, role: Role, epoch: u64, salt: Salt) -> u32 {
    let mut h = FNV_OFFSET;
    h = fnv1a_bytes(h, &pos.x.to_le_bytes());
    h = fnv1a_bytes(h, &pos.y.to_le_bytes());
    h = fnv1a_bytes(h, &epoch.to_le_bytes());
    h = fnv1a_bytes(h, &[role as u8, salt as u8]);
    (finalize(h) >> 32) as u32
}

/// A single draw source: one cell, one role, one epoch.
#[derive(Clone, Copy, Debug)]
pub struct Draw {
    /// Position the draw is keyed on.
    pub pos: Pos,
    /// Role the draw is keyed on.
    pub role: Role,
    /// Growth epoch (`tick / 4`).
    pub epoch: u64,
}

impl Draw {
    /// Whether an event with probability `chance / CHANCE_ONE` fires.
    pub fn chance(&self, salt: Salt, chance: u32) -> bool {
        if chance == 0 {
            return false;
        }
        if chance >= CHANCE_ONE {
            return true;
        }
        (cell_hash(self.pos, self.role, self.epoch, salt) & 0xFFFF) < chance
    }

    /// Uniform value in `lo..=hi`. Returns `lo` if the range is empty.
    pub fn range(&self, salt: Salt, lo: u8, hi: u8) -> u8 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u32 + 1;
        lo + (cell_hash(self.pos, self.role, self.epoch, salt) % span) as u8
    }

    /// `+1` or `-1`.
    pub fn sign(&self, salt: Salt) -> i8 {
        if cell_hash(self.pos, self.role, self.epoch, salt) & 1 == 0 {
            1
        } else {
            -1
        }
    }
}
