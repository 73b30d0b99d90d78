//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A supplied plane does not match the arena's cell count.
    PlaneLength {
        /// `"state"` or `"meta"`.
        plane: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },
    /// `begin_phase()` or an authoring call while a phase is open.
    PhaseInProgress,
    /// `publish()` without a matching `begin_phase()`.
    NoPhaseInProgress,
    /// A cell index past the end of the planes.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of cells.
        cell_count: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaneLength {
                plane,
                expected,
                actual,
            } => write!(
                f,
                "{plane} plane is {actual} bytes, expected {expected} bytes"
            ),
            Self::PhaseInProgress => write!(f, "a phase is already in progress"),
            Self::NoPhaseInProgress => write!(f, "publish called with no phase in progress"),
            Self::IndexOutOfRange { index, cell_count } => {
                write!(f, "cell index {index} out of range for {cell_count} cells")
            }
        }
    }
}

impl Error for ArenaError {}
