//! The decoded per-cell record.
//!
//! Kernels never touch packed bytes directly: each phase decodes the
//! published planes into [`Cell`] values once, works on those, and the
//! [`codec`](crate::codec) re-encodes at the write boundary.

use std::fmt;

use crate::id::LineageId;

/// Number of quantized heading buckets.
pub const HEADING_BUCKETS: u8 = 32;

/// Number of line-error levels (the stepper accumulates in eighths).
pub const ERROR_LEVELS: u8 = 8;

/// Smallest representable resource value.
pub const RESOURCE_MIN: i16 = -127;

/// Largest representable resource value.
pub const RESOURCE_MAX: i16 = 127;

// ── Role ────────────────────────────────────────────────────────

/// What kind of growth a cell is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Role {
    /// Above-ground growth into air.
    #[default]
    Branch = 0,
    /// Below-ground growth into dirt.
    Root = 1,
}

impl Role {
    /// Decode a role nibble. Unknown roles clamp to [`Role::Root`].
    pub fn from_nibble(n: u8) -> Self {
        match n & 0x0F {
            0 => Self::Branch,
            _ => Self::Root,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Root => f.write_str("root"),
        }
    }
}

// ── Heading ─────────────────────────────────────────────────────

/// A growth direction quantized to one of 32 buckets.
///
/// Bucket 0 points up (+y); buckets advance clockwise, so bucket 8 is +x,
/// 16 is -y and 24 is -x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Heading(u8);

impl Heading {
    /// Straight up.
    pub const UP: Heading = Heading(0);
    /// Straight down.
    pub const DOWN: Heading = Heading(16);

    /// Build a heading, wrapping `bucket` into `0..32`.
    pub fn new(bucket: u8) -> Self {
        Self(bucket % HEADING_BUCKETS)
    }

    /// The bucket index in `0..32`.
    pub fn bucket(self) -> u8 {
        self.0
    }

    /// Rotate by `delta` buckets (positive is clockwise).
    pub fn rotate(self, delta: i8) -> Self {
        let b = (self.0 as i16 + delta as i16).rem_euclid(HEADING_BUCKETS as i16);
        Self(b as u8)
    }

    /// The heading pointing the opposite way.
    pub fn opposite(self) -> Self {
        self.rotate(16)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Line-stepper error accumulator, in eighths (`0..8`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct LineError(u8);

impl LineError {
    /// Zero accumulated error.
    pub const ZERO: LineError = LineError(0);

    /// Build an error level, clamping to `0..8`.
    pub fn new(level: u8) -> Self {
        Self(level.min(ERROR_LEVELS - 1))
    }

    /// The level in `0..8`.
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── Cell ────────────────────────────────────────────────────────

/// One grid position's automaton state.
///
/// An unoccupied cell (`lineage == None`) carries only its resource; the
/// other fields are meaningless for it and are normalised to zero by
/// [`Cell::vacant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    /// Lineage id, or `None` if nothing has grown here.
    pub lineage: Option<LineageId>,
    /// Planted explicitly rather than grown. Origins never have a parent.
    pub origin: bool,
    /// Branch or root. Fixed at birth.
    pub role: Role,
    /// Growth direction. Fixed at birth.
    pub heading: Heading,
    /// Stepper error left over after the step that created this cell.
    pub line_error: LineError,
    /// Branch suppression, 0..=255.
    pub inhibition: u8,
    /// Signed resource in `RESOURCE_MIN..=RESOURCE_MAX`.
    pub resource: i16,
}

impl Cell {
    /// An unoccupied cell holding `resource`.
    pub fn vacant(resource: i16) -> Self {
        Self {
            resource: clamp_resource(resource as i32),
            ..Self::default()
        }
    }

    /// An occupied, non-origin cell with zero inhibition and line error.
    pub fn grown(lineage: LineageId, role: Role, heading: Heading, resource: i16) -> Self {
        Self {
            lineage: Some(lineage),
            origin: false,
            role,
            heading,
            line_error: LineError::ZERO,
            inhibition: 0,
            resource: clamp_resource(resource as i32),
        }
    }

    /// A planted origin cell.
    pub fn planted(lineage: LineageId, role: Role, heading: Heading, resource: i16) -> Self {
        Self {
            origin: true,
            ..Self::grown(lineage, role, heading, resource)
        }
    }

    /// Whether anything has grown here.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.lineage.is_some()
    }

    /// Whether this cell is occupied with the given role.
    #[inline]
    pub fn is_role(&self, role: Role) -> bool {
        self.is_occupied() && self.role == role
    }

    /// Copy of this cell with `resource` replaced, clamped to range.
    ///
    /// Returns the cell and whether clamping changed the value.
    pub fn with_resource(self, resource: i32) -> (Self, bool) {
        let clamped = clamp_resource(resource);
        (
            Self {
                resource: clamped,
                ..self
            },
            clamped as i32 != resource,
        )
    }
}

/// Clamp a wide resource value into the storable range.
#[inline]
pub fn clamp_resource(v: i32) -> i16 {
    v.clamp(RESOURCE_MIN as i32, RESOURCE_MAX as i32) as i16
}
