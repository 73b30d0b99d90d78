//! Error types for host-supplied inputs and seeding.

use std::error::Error;
use std::fmt;

use crate::material::Material;

/// A host-supplied input buffer was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum InputError {
    /// A per-cell buffer has the wrong number of entries.
    LengthMismatch {
        /// Which input was rejected.
        input: &'static str,
        /// Expected number of entries.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },
    /// A fertility sample is NaN or infinite.
    NonFiniteFertility {
        /// Flat cell index of the first bad sample.
        index: usize,
        /// The offending value.
        value: f32,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                input,
                expected,
                actual,
            } => write!(
                f,
                "{input} buffer has {actual} entries, expected {expected}"
            ),
            Self::NonFiniteFertility { index, value } => {
                write!(f, "fertility at cell {index} is not finite ({value})")
            }
        }
    }
}

impl Error for InputError {}

/// An origin cell could not be planted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlantError {
    /// The position lies outside the grid.
    OutOfBounds {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
    },
    /// Something has already grown at the position.
    Occupied {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
    },
    /// The position's medium cannot host the requested role.
    WrongMedium {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
        /// The material found there.
        found: Material,
    },
}

impl fmt::Display for PlantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y } => write!(f, "({x}, {y}) is outside the grid"),
            Self::Occupied { x, y } => write!(f, "({x}, {y}) is already occupied"),
            Self::WrongMedium { x, y, found } => {
                write!(f, "({x}, {y}) is {found}, which cannot host this role")
            }
        }
    }
}

impl Error for PlantError {}
