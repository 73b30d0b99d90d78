//! Strongly-typed identifiers.

use std::fmt;
use std::num::NonZeroU8;

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation runs one phase. The phase of a
/// tick is `tick % 4`; the growth epoch is `tick / 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick after this one, wrapping at `u64::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// The four-tick cycle this tick belongs to.
    pub fn epoch(self) -> u64 {
        self.0 / 4
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a lineage: every cell grown from one origin shares its id.
///
/// Stored as a single byte where zero is reserved for "unoccupied", so the
/// id itself is always in `1..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineageId(NonZeroU8);

impl LineageId {
    /// Wrap a raw byte, returning `None` for the reserved zero value.
    pub fn new(raw: u8) -> Option<Self> {
        NonZeroU8::new(raw).map(Self)
    }

    /// The raw byte value (never zero).
    pub fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroU8> for LineageId {
    fn from(v: NonZeroU8) -> Self {
        Self(v)
    }
}
